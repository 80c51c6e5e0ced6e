use std::path::PathBuf;

use rusqlite::Connection;
use serde::Deserialize;

use crate::directory::{Identity, UserDirectory};

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
    pub directory: Box<dyn UserDirectory>,
    /// The current authenticated identity. Exactly one or none; rehydrated
    /// from storage when a workspace is selected.
    pub current: Option<Identity>,
}

impl AppState {
    pub fn new(directory: Box<dyn UserDirectory>) -> Self {
        AppState {
            workspace: None,
            db: None,
            directory,
            current: None,
        }
    }
}
