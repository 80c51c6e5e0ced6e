use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

/// Storage keys shared with the UI shell. The table is a flat key->JSON
/// namespace, one key per store, mirroring the web build's localStorage
/// layout so exported workspaces stay comparable across shells.
pub const KEY_CURRENT_USER: &str = "currentUser";
pub const KEY_FOLDERS: &str = "pastPaperFolders";
pub const KEY_PAPERS: &str = "uploadedPapers";
pub const KEY_THEME: &str = "theme";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join("ibhub.sqlite3");
    let conn = Connection::open(db_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS storage(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT
        )",
        [],
    )?;

    Ok(conn)
}

/// Returns the parsed JSON value stored under `key`, or None when the key is
/// absent. A value that no longer parses is treated as absent rather than an
/// error: a corrupt row must never wedge startup or rehydration.
pub fn storage_get_json(conn: &Connection, key: &str) -> anyhow::Result<Option<serde_json::Value>> {
    let raw: Option<String> = conn
        .query_row("SELECT value FROM storage WHERE key = ?", [key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(raw.and_then(|s| serde_json::from_str(&s).ok()))
}

pub fn storage_set_json(
    conn: &Connection,
    key: &str,
    value: &serde_json::Value,
) -> anyhow::Result<()> {
    let updated_at = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO storage(key, value, updated_at) VALUES(?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        (key, serde_json::to_string(value)?, updated_at),
    )?;
    Ok(())
}

/// Idempotent: removing an absent key is a no-op.
pub fn storage_remove(conn: &Connection, key: &str) -> anyhow::Result<()> {
    conn.execute("DELETE FROM storage WHERE key = ?", [key])?;
    Ok(())
}
