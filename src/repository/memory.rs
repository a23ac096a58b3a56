use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{NewNote, Note, NoteId, NotePatch};

use super::{NoteStore, StoreError};

/// Process-local store keeping notes in insertion order.
///
/// Each operation holds the lock for its whole read-modify-write, which gives
/// the same per-note atomicity as the database-backed store.
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: RwLock<Vec<Note>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn insert(&self, note: NewNote) -> Result<Note, StoreError> {
        let mut notes = self.notes.write().await;

        let mut id = NoteId::generate();
        while notes.iter().any(|n| n.id == id) {
            id = NoteId::generate();
        }

        let note = Note {
            id,
            title: note.title,
            content: note.content,
            tags: note.tags,
            created_at: Utc::now(),
        };
        notes.push(note.clone());

        Ok(note)
    }

    async fn find(&self, tag: Option<&str>) -> Result<Vec<Note>, StoreError> {
        let notes = self.notes.read().await;

        Ok(notes
            .iter()
            .filter(|n| tag.is_none_or(|tag| n.has_tag(tag)))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>, StoreError> {
        Ok(self.notes.read().await.iter().find(|n| &n.id == id).cloned())
    }

    async fn update_by_id(
        &self,
        id: &NoteId,
        patch: NotePatch,
    ) -> Result<Option<Note>, StoreError> {
        let mut notes = self.notes.write().await;

        Ok(notes.iter_mut().find(|n| &n.id == id).map(|note| {
            patch.apply(note);
            note.clone()
        }))
    }

    async fn delete_by_id(&self, id: &NoteId) -> Result<Option<Note>, StoreError> {
        let mut notes = self.notes.write().await;

        Ok(notes
            .iter()
            .position(|n| &n.id == id)
            .map(|index| notes.remove(index)))
    }
}
