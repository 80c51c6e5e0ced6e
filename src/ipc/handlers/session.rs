use crate::catalog;
use crate::db;
use crate::directory::Identity;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn current_user_json(state: &AppState) -> serde_json::Value {
    state
        .current
        .as_ref()
        .map(|u| u.to_json())
        .unwrap_or(serde_json::Value::Null)
}

fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(email) = req.params.get("email").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing email", None);
    };
    let Some(password) = req.params.get("password").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing password", None);
    };

    // Mock authentication: exact table lookup, no lockout, no rate limiting.
    // A mismatch is a business result, not an error, and leaves the current
    // identity untouched.
    let Some(record) = state.directory.find_by_email(email) else {
        return ok(&req.id, json!({ "success": false }));
    };
    if record.password != password {
        return ok(&req.id, json!({ "success": false }));
    }

    let identity = record.to_identity();
    if let Err(e) = db::storage_set_json(conn, db::KEY_CURRENT_USER, &identity.to_json()) {
        return err(&req.id, "db_update_failed", e.to_string(), None);
    }
    state.current = Some(identity);

    ok(
        &req.id,
        json!({ "success": true, "user": current_user_json(state) }),
    )
}

fn handle_current(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "user": current_user_json(state) }))
}

fn handle_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Some(conn) = state.db.as_ref() {
        if let Err(e) = db::storage_remove(conn, db::KEY_CURRENT_USER) {
            return err(&req.id, "db_update_failed", e.to_string(), None);
        }
    }
    state.current = None;
    ok(&req.id, json!({ "ok": true }))
}

fn parse_subject_ids(params: &serde_json::Value) -> Result<Vec<String>, String> {
    let raw = params
        .get("subjectIds")
        .and_then(|v| v.as_array())
        .ok_or_else(|| "subjectIds must be an array".to_string())?;
    raw.iter()
        .map(|v| {
            v.as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| "subjectIds must contain strings".to_string())
        })
        .collect()
}

fn handle_update_subjects(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let subject_ids = match parse_subject_ids(&req.params) {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };

    // No current identity: silent no-op, no storage write.
    let Some(mut identity) = state.current.clone() else {
        return ok(&req.id, json!({ "updated": false }));
    };

    // The derived aggregate is recomputed here, at the only point its input
    // changes, instead of on every render of the stats view.
    identity.subjects = subject_ids;
    identity.progress = catalog::aggregate_progress(&identity.subjects);

    if let Err(e) = db::storage_set_json(conn, db::KEY_CURRENT_USER, &identity.to_json()) {
        return err(&req.id, "db_update_failed", e.to_string(), None);
    }
    state.directory.mirror(&identity);
    state.current = Some(identity);

    ok(
        &req.id,
        json!({ "updated": true, "user": current_user_json(state) }),
    )
}

fn handle_update_progress(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(progress) = req.params.get("progress").and_then(|v| v.as_i64()) else {
        return err(&req.id, "bad_params", "missing progress", None);
    };
    if !(0..=100).contains(&progress) {
        return err(&req.id, "bad_params", "progress must be in 0..=100", None);
    }

    let Some(mut identity) = state.current.clone() else {
        return ok(&req.id, json!({ "updated": false }));
    };

    identity.progress = progress;
    if let Err(e) = db::storage_set_json(conn, db::KEY_CURRENT_USER, &identity.to_json()) {
        return err(&req.id, "db_update_failed", e.to_string(), None);
    }
    state.directory.mirror(&identity);
    state.current = Some(identity);

    ok(
        &req.id,
        json!({ "updated": true, "user": current_user_json(state) }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "session.login" => Some(handle_login(state, req)),
        "session.current" => Some(handle_current(state, req)),
        "session.logout" => Some(handle_logout(state, req)),
        "session.updateSubjects" => Some(handle_update_subjects(state, req)),
        "session.updateProgress" => Some(handle_update_progress(state, req)),
        _ => None,
    }
}
