use crate::{
    models::{NewNote, Note, NoteId, NotePatch},
    repository::{NoteStore, StoreError},
    validation::{MalformedIdentifier, ValidationErrors},
};

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error(transparent)]
    MalformedIdentifier(#[from] MalformedIdentifier),

    #[error(transparent)]
    InvalidPayload(#[from] ValidationErrors),

    #[error("Note not found: {0}")]
    NotFound(NoteId),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    pub async fn create_note(&self, note: NewNote) -> Result<Note, NoteError> {
        let note = self.store.insert(note).await?;
        tracing::debug!("created note {}", note.id);
        Ok(note)
    }

    pub async fn list_notes(&self, tag: Option<&str>) -> Result<Vec<Note>, NoteError> {
        Ok(self.store.find(tag).await?)
    }

    pub async fn get_note(&self, id: &NoteId) -> Result<Note, NoteError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| NoteError::NotFound(id.clone()))
    }

    pub async fn update_note(&self, id: &NoteId, patch: NotePatch) -> Result<Note, NoteError> {
        self.store
            .update_by_id(id, patch)
            .await?
            .ok_or_else(|| NoteError::NotFound(id.clone()))
    }

    pub async fn delete_note(&self, id: &NoteId) -> Result<Note, NoteError> {
        let note = self
            .store
            .delete_by_id(id)
            .await?
            .ok_or_else(|| NoteError::NotFound(id.clone()))?;
        tracing::debug!("deleted note {}", note.id);
        Ok(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryNoteStore;

    fn service() -> NoteService {
        NoteService::new(Arc::new(MemoryNoteStore::new()))
    }

    fn test_note() -> NewNote {
        NewNote {
            title: "Test Note".to_string(),
            content: Some("This is a test".to_string()),
            tags: vec!["test".to_string()],
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let service = service();
        let created = service.create_note(test_note()).await.unwrap();

        assert_eq!(created.title, "Test Note");
        assert_eq!(created.content.as_deref(), Some("This is a test"));
        assert_eq!(created.tags, ["test"]);
        assert_eq!(service.get_note(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn list_filters_by_tag() {
        let service = service();
        let created = service.create_note(test_note()).await.unwrap();

        assert_eq!(service.list_notes(Some("test")).await.unwrap(), [created.clone()]);
        assert!(service.list_notes(Some("other")).await.unwrap().is_empty());
        assert_eq!(service.list_notes(None).await.unwrap(), [created]);
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() {
        assert!(service().list_notes(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let service = service();
        let created = service.create_note(test_note()).await.unwrap();

        let updated = service
            .update_note(
                &created.id,
                NotePatch {
                    title: Some("Updated".to_string()),
                    ..NotePatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Updated");
        assert_eq!(updated.content, created.content);
        assert_eq!(updated.tags, created.tags);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.id, created.id);
    }

    #[tokio::test]
    async fn empty_update_returns_current_state() {
        let service = service();
        let created = service.create_note(test_note()).await.unwrap();

        let same = service
            .update_note(&created.id, NotePatch::default())
            .await
            .unwrap();
        assert_eq!(same, created);
    }

    #[tokio::test]
    async fn delete_returns_last_state_then_not_found() {
        let service = service();
        let created = service.create_note(test_note()).await.unwrap();

        assert_eq!(service.delete_note(&created.id).await.unwrap(), created);
        assert!(matches!(
            service.get_note(&created.id).await,
            Err(NoteError::NotFound(id)) if id == created.id
        ));
    }

    #[tokio::test]
    async fn absent_notes_are_not_found_everywhere() {
        let service = service();
        let id = NoteId::generate();

        assert!(matches!(service.get_note(&id).await, Err(NoteError::NotFound(_))));
        assert!(matches!(
            service.update_note(&id, NotePatch::default()).await,
            Err(NoteError::NotFound(_))
        ));
        assert!(matches!(service.delete_note(&id).await, Err(NoteError::NotFound(_))));
    }
}
