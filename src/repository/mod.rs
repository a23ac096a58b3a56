mod memory;
mod postgres;

pub use memory::MemoryNoteStore;
pub use postgres::PgNoteStore;

use async_trait::async_trait;

use crate::models::{NewNote, Note, NoteId, NotePatch};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// Failure from any other backend.
    #[error("store backend error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend(e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(e.into())
    }
}

/// Document store operations the note service relies on.
///
/// Every call is atomic for a single note. A missing note is reported as
/// `Ok(None)`, never as an error.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persists a note, assigning its id and creation time.
    async fn insert(&self, note: NewNote) -> Result<Note, StoreError>;

    /// Returns every note, or only those carrying `tag` when one is given.
    async fn find(&self, tag: Option<&str>) -> Result<Vec<Note>, StoreError>;

    async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>, StoreError>;

    /// Applies `patch` and returns the updated note in one step.
    async fn update_by_id(&self, id: &NoteId, patch: NotePatch)
    -> Result<Option<Note>, StoreError>;

    /// Removes the note and returns its last state.
    async fn delete_by_id(&self, id: &NoteId) -> Result<Option<Note>, StoreError>;
}
