use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row};

use crate::models::{NewNote, Note, NoteId, NotePatch};

use super::{NoteStore, StoreError};

refinery::embed_migrations!("migrations");

const COLUMNS: &str = "id, title, content, tags, created_at";

// Must stay a containment test to hit the GIN index on `tags`.
const FIND_BY_TAG: &str = "SELECT id, title, content, tags, created_at FROM notes \
                           WHERE tags @> ARRAY[$1::TEXT] ORDER BY created_at, id";

pub struct PgNoteStore {
    client: Client,
}

impl PgNoteStore {
    pub async fn new(database_dsn: &str) -> Result<Self, tokio_postgres::Error> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub async fn migrate(&mut self) -> Result<(), refinery::Error> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: NoteId(row.get("id")),
        title: row.get("title"),
        content: row.get("content"),
        tags: row.get("tags"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn insert(&self, note: NewNote) -> Result<Note, StoreError> {
        let id = NoteId::generate();
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO notes (id, title, content, tags) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
                ),
                &[&id.as_str(), &note.title, &note.content, &note.tags],
            )
            .await?;

        Ok(note_from_row(&row))
    }

    async fn find(&self, tag: Option<&str>) -> Result<Vec<Note>, StoreError> {
        let rows = match tag {
            Some(tag) => self.client.query(FIND_BY_TAG, &[&tag]).await?,
            None => {
                self.client
                    .query(
                        &format!("SELECT {COLUMNS} FROM notes ORDER BY created_at, id"),
                        &[],
                    )
                    .await?
            }
        };

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>, StoreError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {COLUMNS} FROM notes WHERE id = $1"),
                &[&id.as_str()],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn update_by_id(
        &self,
        id: &NoteId,
        patch: NotePatch,
    ) -> Result<Option<Note>, StoreError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE notes SET \
                     title = COALESCE($2, title), \
                     content = COALESCE($3, content), \
                     tags = COALESCE($4, tags) \
                     WHERE id = $1 RETURNING {COLUMNS}"
                ),
                &[&id.as_str(), &patch.title, &patch.content, &patch.tags],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn delete_by_id(&self, id: &NoteId) -> Result<Option<Note>, StoreError> {
        let row = self
            .client
            .query_opt(
                &format!("DELETE FROM notes WHERE id = $1 RETURNING {COLUMNS}"),
                &[&id.as_str()],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }
}
