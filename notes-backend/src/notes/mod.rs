//! Note storage interface
//!
//! Handlers only ever see a `NoteStore`. Two implementations exist:
//! `db::Database` (SQLite file, survives restarts) and `MemoryNoteStore`
//! (process memory, starts over on every restart).

pub mod memory;

pub use memory::MemoryNoteStore;
pub use notes_types::Note;

use crate::error::StoreError;

/// Fields supplied when creating a note. `title` is already validated non-empty.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub body: String,
}

/// Partial update: `Some` replaces the stored value, `None` keeps it.
#[derive(Debug, Clone, Default)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl NoteChanges {
    pub fn apply(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(body) = self.body {
            note.body = body;
        }
    }
}

/// CRUD over the single `notes` collection.
///
/// Each call is one unit of work against storage; nothing spans calls.
pub trait NoteStore: Send + Sync {
    /// All notes, newest first (ties: higher id first)
    fn list(&self) -> Result<Vec<Note>, StoreError>;

    fn get_by_id(&self, id: i64) -> Result<Option<Note>, StoreError>;

    /// Assigns `id` and `created_at` and returns the stored note
    fn insert(&self, note: NewNote) -> Result<Note, StoreError>;

    /// Returns `None` without writing when no note has this id
    fn update_by_id(&self, id: i64, changes: NoteChanges) -> Result<Option<Note>, StoreError>;

    /// Returns `false` when nothing was deleted
    fn delete_by_id(&self, id: i64) -> Result<bool, StoreError>;
}
