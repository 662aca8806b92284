//! In-memory note store. Everything here is lost when the process exits.

use chrono::Utc;
use parking_lot::Mutex;

use super::{NewNote, Note, NoteChanges, NoteStore};
use crate::error::StoreError;

/// Same layout SQLite's `datetime('now')` produces
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

struct MemoryState {
    /// Insertion order, oldest first
    notes: Vec<Note>,
    next_id: i64,
}

pub struct MemoryNoteStore {
    state: Mutex<MemoryState>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                notes: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// A store holding the single starter note shown on first launch
    pub fn with_welcome_note() -> Self {
        let store = Self::new();
        store.push(NewNote {
            title: "Welcome".to_string(),
            body: "This is your first note!".to_string(),
        });
        store
    }

    fn push(&self, note: NewNote) -> Note {
        let mut state = self.state.lock();
        let stored = Note {
            id: state.next_id,
            title: note.title,
            body: note.body,
            created_at: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
        };
        state.next_id += 1;
        state.notes.push(stored.clone());
        stored
    }
}

impl Default for MemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore for MemoryNoteStore {
    fn list(&self) -> Result<Vec<Note>, StoreError> {
        let state = self.state.lock();
        let mut notes = state.notes.clone();
        // ids only grow, so reversed insertion order already satisfies created_at DESC, id DESC
        notes.reverse();
        Ok(notes)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Note>, StoreError> {
        let state = self.state.lock();
        Ok(state.notes.iter().find(|n| n.id == id).cloned())
    }

    fn insert(&self, note: NewNote) -> Result<Note, StoreError> {
        Ok(self.push(note))
    }

    fn update_by_id(&self, id: i64, changes: NoteChanges) -> Result<Option<Note>, StoreError> {
        let mut state = self.state.lock();
        let Some(note) = state.notes.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };
        changes.apply(note);
        Ok(Some(note.clone()))
    }

    fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let mut state = self.state.lock();
        let before = state.notes.len();
        state.notes.retain(|n| n.id != id);
        Ok(state.notes.len() != before)
    }
}
