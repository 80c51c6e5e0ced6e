use crate::db;
use crate::directory::Role;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rusqlite::Connection;
use serde_json::json;
use uuid::Uuid;

struct HandlerErr {
    code: &'static str,
    message: String,
    details: Option<serde_json::Value>,
}

impl HandlerErr {
    fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }

    fn bad_params(message: impl Into<String>) -> HandlerErr {
        HandlerErr {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    fn db(e: anyhow::Error) -> HandlerErr {
        HandlerErr {
            code: "db_update_failed",
            message: e.to_string(),
            details: None,
        }
    }
}

fn require_db(state: &AppState) -> Result<&Connection, HandlerErr> {
    state.db.as_ref().ok_or_else(|| HandlerErr {
        code: "no_workspace",
        message: "select a workspace first".to_string(),
        details: None,
    })
}

/// Folder and paper mutations are the admin upload surface; the UI hides
/// them from students, the daemon refuses them outright.
fn require_admin(state: &AppState) -> Result<(), HandlerErr> {
    match state.current.as_ref() {
        Some(user) if user.role == Role::Admin => Ok(()),
        _ => Err(HandlerErr {
            code: "forbidden",
            message: "admin role required".to_string(),
            details: None,
        }),
    }
}

fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

/// Loads a stored JSON array, tolerating absence and malformed shapes as
/// empty. Both stores rewrite the whole list on every mutation, so a bad
/// historical value heals on the next write.
fn load_list(conn: &Connection, key: &str) -> Result<Vec<serde_json::Value>, HandlerErr> {
    let stored = db::storage_get_json(conn, key).map_err(|e| HandlerErr {
        code: "db_query_failed",
        message: e.to_string(),
        details: None,
    })?;
    Ok(stored
        .and_then(|v| v.as_array().cloned())
        .unwrap_or_default())
}

fn save_list(conn: &Connection, key: &str, list: &[serde_json::Value]) -> Result<(), HandlerErr> {
    db::storage_set_json(conn, key, &json!(list)).map_err(HandlerErr::db)
}

fn folder_names(list: &[serde_json::Value]) -> Vec<String> {
    list.iter()
        .filter_map(|v| v.as_str())
        .map(|s| s.to_string())
        .collect()
}

fn folders_list(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(state)?;
    let folders = folder_names(&load_list(conn, db::KEY_FOLDERS)?);
    Ok(json!({ "folders": folders }))
}

fn folders_create(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(state)?;
    require_admin(state)?;
    let name = get_required_str(&req.params, "name")?;
    let name = name.trim().to_string();

    let mut list = load_list(conn, db::KEY_FOLDERS)?;
    if name.is_empty() {
        // Blank names are swallowed, not rejected: the add-folder dialog
        // just closes without creating anything.
        return Ok(json!({ "created": false, "folders": folder_names(&list) }));
    }

    // Duplicate names are allowed; the store appends verbatim.
    list.push(json!(name));
    save_list(conn, db::KEY_FOLDERS, &list)?;
    Ok(json!({ "created": true, "folders": folder_names(&list) }))
}

fn papers_list(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(state)?;
    let papers = load_list(conn, db::KEY_PAPERS)?;

    let subject = req.params.get("subject").and_then(|v| v.as_str());
    let year = req.params.get("year").and_then(|v| v.as_i64());
    let session = req.params.get("session").and_then(|v| v.as_str());

    let filtered: Vec<serde_json::Value> = match (subject, year, session) {
        (Some(subject), Some(year), Some(session)) => {
            // Parity with the web build: a paper belongs to a (subject,
            // year, session) triple when its composite name contains all
            // three context strings. Substring matching, false positives
            // included.
            let year = year.to_string();
            papers
                .into_iter()
                .filter(|p| {
                    p.get("name")
                        .and_then(|n| n.as_str())
                        .map(|n| n.contains(subject) && n.contains(&year) && n.contains(session))
                        .unwrap_or(false)
                })
                .collect()
        }
        _ => papers,
    };

    Ok(json!({ "papers": filtered }))
}

fn papers_upload(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(state)?;
    require_admin(state)?;

    // Commit-time guard: the upload dialog cannot open without a subject,
    // year and session selected, but the store re-checks anyway.
    let subject = get_required_str(&req.params, "subject")?.trim().to_string();
    let session = get_required_str(&req.params, "session")?.trim().to_string();
    let Some(year) = req.params.get("year").and_then(|v| v.as_i64()) else {
        return Err(HandlerErr::bad_params("missing year"));
    };
    if subject.is_empty() || session.is_empty() || year == 0 {
        return Err(HandlerErr {
            code: "bad_params",
            message: "upload context incomplete".to_string(),
            details: Some(json!({
                "subject": subject,
                "year": year,
                "session": session
            })),
        });
    }

    let paper_label = get_required_str(&req.params, "name")?.trim().to_string();
    if paper_label.is_empty() {
        return Err(HandlerErr::bad_params("name must not be empty"));
    }

    let file_b64 = get_required_str(&req.params, "fileBase64")?;
    let bytes = BASE64
        .decode(file_b64.trim())
        .map_err(|_| HandlerErr::bad_params("fileBase64 is not valid base64"))?;
    let mime_type = req
        .params
        .get("mimeType")
        .and_then(|v| v.as_str())
        .unwrap_or("application/pdf");

    // Self-contained payload: re-encode so the stored data URL is canonical
    // regardless of how the shell padded its input.
    let download_url = format!("data:{};base64,{}", mime_type, BASE64.encode(&bytes));
    let paper = json!({
        "id": Uuid::new_v4().to_string(),
        "name": format!("{} {} - {} {}", subject, paper_label, session, year),
        "paper": paper_label,
        "downloadUrl": download_url,
        "uploadedAt": chrono::Utc::now().to_rfc3339(),
    });

    let mut list = load_list(conn, db::KEY_PAPERS)?;
    list.push(paper.clone());
    save_list(conn, db::KEY_PAPERS, &list)?;

    Ok(json!({ "paper": paper }))
}

fn papers_delete(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(state)?;
    require_admin(state)?;
    let paper_id = get_required_str(&req.params, "paperId")?;

    let mut list = load_list(conn, db::KEY_PAPERS)?;
    let before = list.len();
    list.retain(|p| p.get("id").and_then(|v| v.as_str()) != Some(paper_id.as_str()));
    let removed = list.len() != before;

    // Whole-list overwrite either way; an absent id is a quiet no-op.
    save_list(conn, db::KEY_PAPERS, &list)?;
    Ok(json!({ "removed": removed }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let resp = match req.method.as_str() {
        "folders.list" => folders_list(state),
        "folders.create" => folders_create(state, req),
        "papers.list" => papers_list(state, req),
        "papers.upload" => papers_upload(state, req),
        "papers.delete" => papers_delete(state, req),
        _ => return None,
    };
    Some(match resp {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    })
}
