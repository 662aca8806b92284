//! Notes table operations

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::super::Database;
use crate::error::StoreError;
use crate::notes::{NewNote, Note, NoteChanges, NoteStore};

const SELECT_COLUMNS: &str = "SELECT id, title, body, created_at FROM notes";

impl Database {
    fn row_to_note(row: &Row) -> rusqlite::Result<Note> {
        Ok(Note {
            id: row.get(0)?,
            title: row.get(1)?,
            body: row.get(2)?,
            created_at: row.get(3)?,
        })
    }

    fn select_note(conn: &Connection, id: i64) -> rusqlite::Result<Option<Note>> {
        conn.query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            params![id],
            Self::row_to_note,
        )
        .optional()
    }
}

impl NoteStore for Database {
    fn list(&self) -> Result<Vec<Note>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY created_at DESC, id DESC",
            SELECT_COLUMNS
        ))?;
        let notes = stmt
            .query_map([], Self::row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Note>, StoreError> {
        let conn = self.conn.lock();
        Ok(Self::select_note(&conn, id)?)
    }

    fn insert(&self, note: NewNote) -> Result<Note, StoreError> {
        // Lock held across insert and read-back so last_insert_rowid is ours
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO notes (title, body) VALUES (?1, ?2)",
            params![note.title, note.body],
        )?;
        let id = conn.last_insert_rowid();

        Self::select_note(&conn, id)?.ok_or(StoreError::Database(
            rusqlite::Error::QueryReturnedNoRows,
        ))
    }

    fn update_by_id(&self, id: i64, changes: NoteChanges) -> Result<Option<Note>, StoreError> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE notes SET title = COALESCE(?1, title), body = COALESCE(?2, body) WHERE id = ?3",
            params![changes.title, changes.body, id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        Ok(Self::select_note(&conn, id)?)
    }

    fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let deleted = conn.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}
