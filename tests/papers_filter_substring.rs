use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

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

fn list_names(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    params: serde_json::Value,
) -> Vec<String> {
    request_ok(stdin, reader, id, "papers.list", params)
        .get("papers")
        .and_then(|v| v.as_array())
        .map(|papers| {
            papers
                .iter()
                .filter_map(|p| p.get("name").and_then(|n| n.as_str()))
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Locks in the web build's lookup contract: a paper belongs to a
/// (subject, year, session) triple when its composite name contains all
/// three as substrings. That includes the contract's false positives.
#[test]
fn triple_filter_matches_by_substring_containment() {
    let workspace = temp_dir("ibhub-filter");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "session.login",
        json!({ "email": "ibmaster@gmail.com", "password": "IloveIB!" }),
    );

    let uploads = [
        ("u1", "Physics HL", 2024, "May", "Paper 1"),
        ("u2", "Physics HL", 2024, "November", "Paper 1"),
        ("u3", "Chemistry HL", 2024, "May", "Paper 2"),
        ("u4", "Physics HL", 2023, "May", "Paper 1"),
    ];
    for (id, subject, year, session, label) in uploads {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            id,
            "papers.upload",
            json!({
                "subject": subject,
                "year": year,
                "session": session,
                "name": label,
                "fileBase64": BASE64.encode(id.as_bytes())
            }),
        );
    }

    // Fully qualified triple: exactly the one paper.
    let names = list_names(
        &mut stdin,
        &mut reader,
        "3",
        json!({ "subject": "Physics HL", "year": 2024, "session": "May" }),
    );
    assert_eq!(names, vec!["Physics HL Paper 1 - May 2024".to_string()]);

    // "HL" is a substring of both subjects: two matches, by design.
    let names = list_names(
        &mut stdin,
        &mut reader,
        "4",
        json!({ "subject": "HL", "year": 2024, "session": "May" }),
    );
    assert_eq!(names.len(), 2);

    // A truncated year like 202 matches 2023 and 2024 alike.
    let names = list_names(
        &mut stdin,
        &mut reader,
        "5",
        json!({ "subject": "Physics HL", "year": 202, "session": "May" }),
    );
    assert_eq!(names.len(), 2);

    // Anything less than the full triple returns the whole list.
    let names = list_names(
        &mut stdin,
        &mut reader,
        "6",
        json!({ "subject": "Physics HL", "year": 2024 }),
    );
    assert_eq!(names.len(), 4);
    let names = list_names(&mut stdin, &mut reader, "7", json!({}));
    assert_eq!(names.len(), 4);
}
