//! SQLite storage initializer
//!
//! Owns the single connection every handler shares. `open` is the only place
//! that touches the database file directly.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::Connection;

use crate::error::StoreError;

/// Schema for the only table. Safe to run against an existing database.
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS notes (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    title      TEXT    NOT NULL,
    body       TEXT    NOT NULL DEFAULT '',
    created_at DATETIME DEFAULT (datetime('now'))
);
";

pub struct Database {
    pub(super) conn: Mutex<Connection>,
    path: PathBuf,
    journal_mode: String,
}

impl Database {
    /// Open or create the database file, switch it to WAL and ensure the schema.
    ///
    /// Existing files and tables are reused untouched. Missing parent
    /// directories are created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(&path)?;

        // journal_mode answers with the mode actually in effect
        let journal_mode: String =
            conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
        if !journal_mode.eq_ignore_ascii_case("wal") {
            log::warn!(
                "[DB] {} refused WAL journaling, running in {} mode",
                path.display(),
                journal_mode
            );
        }

        conn.execute_batch(SCHEMA_SQL)?;

        log::debug!("[DB] Schema ready in {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            path,
            journal_mode,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Journal mode reported by SQLite when the file was opened
    pub fn journal_mode(&self) -> &str {
        &self.journal_mode
    }
}
