use crate::catalog;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_catalog_list(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let subjects: Vec<serde_json::Value> = catalog::all().iter().map(|s| s.to_json()).collect();
    ok(&req.id, json!({ "subjects": subjects }))
}

fn handle_catalog_get(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(subject_id) = req.params.get("subjectId").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing subjectId", None);
    };
    match catalog::find_by_id(subject_id) {
        Some(subject) => ok(&req.id, json!({ "subject": subject.to_json() })),
        None => err(
            &req.id,
            "not_found",
            "subject not found",
            Some(json!({ "subjectId": subject_id })),
        ),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "catalog.list" => Some(handle_catalog_list(state, req)),
        "catalog.get" => Some(handle_catalog_get(state, req)),
        _ => None,
    }
}
