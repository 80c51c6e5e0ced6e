use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_ibhubd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn ibhubd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn catalog_is_served_without_a_workspace() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    // The catalog is build-time data; it needs no storage.
    let listed = request_ok(&mut stdin, &mut reader, "1", "catalog.list", json!({}));
    let subjects = listed
        .get("subjects")
        .and_then(|v| v.as_array())
        .expect("subjects");
    assert_eq!(subjects.len(), 8);

    let physics = &subjects[0];
    assert_eq!(physics.get("id").and_then(|v| v.as_str()), Some("physics-hl"));
    assert_eq!(physics.get("level").and_then(|v| v.as_str()), Some("HL"));
    assert_eq!(physics.get("progress").and_then(|v| v.as_i64()), Some(75));
    assert_eq!(
        physics.get("papers").cloned(),
        Some(json!(["Paper 1", "Paper 2"]))
    );
    let milestones = physics
        .get("milestones")
        .and_then(|v| v.as_array())
        .expect("milestones");
    assert_eq!(milestones.len(), 3);
    assert_eq!(
        milestones[0].get("title").and_then(|v| v.as_str()),
        Some("Topic Selection")
    );
    assert_eq!(
        milestones[0].get("completed").and_then(|v| v.as_bool()),
        Some(true)
    );
    assert_eq!(milestones[0].get("files").cloned(), Some(json!([])));

    let last = &subjects[7];
    assert_eq!(
        last.get("id").and_then(|v| v.as_str()),
        Some("arabic-lang-lit-sl")
    );
    assert_eq!(last.get("level").and_then(|v| v.as_str()), Some("SL"));
}

#[test]
fn catalog_get_looks_up_one_subject() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "catalog.get",
        json!({ "subjectId": "math-aa-hl" }),
    );
    let subject = result.get("subject").expect("subject");
    assert_eq!(subject.get("name").and_then(|v| v.as_str()), Some("Math AA"));
    assert_eq!(subject.get("progress").and_then(|v| v.as_i64()), Some(90));

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "catalog.get",
        json!({ "subjectId": "biology-hl" }),
    );
    assert_eq!(resp.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        resp.get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("not_found")
    );
}
