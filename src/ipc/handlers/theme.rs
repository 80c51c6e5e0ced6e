use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

const THEME_LIGHT: &str = "light";
const THEME_DARK: &str = "dark";

fn stored_theme(conn: &rusqlite::Connection) -> String {
    // Anything other than a valid stored value falls back to light, the
    // same default a fresh profile gets.
    db::storage_get_json(conn, db::KEY_THEME)
        .ok()
        .flatten()
        .and_then(|v| v.as_str().map(|s| s.to_string()))
        .filter(|s| s == THEME_LIGHT || s == THEME_DARK)
        .unwrap_or_else(|| THEME_LIGHT.to_string())
}

fn handle_theme_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let theme = state
        .db
        .as_ref()
        .map(stored_theme)
        .unwrap_or_else(|| THEME_LIGHT.to_string());
    ok(&req.id, json!({ "theme": theme }))
}

fn handle_theme_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let theme = match req.params.get("theme").and_then(|v| v.as_str()) {
        Some(THEME_LIGHT) => THEME_LIGHT,
        Some(THEME_DARK) => THEME_DARK,
        Some(_) => return err(&req.id, "bad_params", "theme must be light or dark", None),
        None => return err(&req.id, "bad_params", "missing theme", None),
    };
    if let Err(e) = db::storage_set_json(conn, db::KEY_THEME, &json!(theme)) {
        return err(&req.id, "db_update_failed", e.to_string(), None);
    }
    ok(&req.id, json!({ "theme": theme }))
}

fn handle_theme_toggle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let next = if stored_theme(conn) == THEME_DARK {
        THEME_LIGHT
    } else {
        THEME_DARK
    };
    if let Err(e) = db::storage_set_json(conn, db::KEY_THEME, &json!(next)) {
        return err(&req.id, "db_update_failed", e.to_string(), None);
    }
    ok(&req.id, json!({ "theme": next }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "theme.get" => Some(handle_theme_get(state, req)),
        "theme.set" => Some(handle_theme_set(state, req)),
        "theme.toggle" => Some(handle_theme_toggle(state, req)),
        _ => None,
    }
}
