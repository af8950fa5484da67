//! PostgreSQL implementation of note repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewNote, Note, NoteChanges};
use crate::domain::repositories::NoteRepository;
use crate::error::AppError;

/// PostgreSQL repository for notes.
///
/// A duplicate slug violates `notes_slug_key` and surfaces as
/// [`AppError::Conflict`].
pub struct PgNoteRepository {
    pool: Arc<PgPool>,
}

impl PgNoteRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct NoteRow {
    id: i64,
    title: String,
    text: String,
    slug: String,
    author_id: i64,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Note {
            id: row.id,
            title: row.title,
            text: row.text,
            slug: row.slug,
            author_id: row.author_id,
        }
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn create(&self, new_note: NewNote) -> Result<Note, AppError> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            INSERT INTO notes (title, text, slug, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, text, slug, author_id
            "#,
        )
        .bind(&new_note.title)
        .bind(&new_note.text)
        .bind(&new_note.slug)
        .bind(new_note.author_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Note>, AppError> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT id, title, text, slug, author_id
            FROM notes
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Note>, AppError> {
        let rows = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT id, title, text, slug, author_id
            FROM notes
            WHERE author_id = $1
            ORDER BY id
            "#,
        )
        .bind(author_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, changes: NoteChanges) -> Result<Note, AppError> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            UPDATE notes SET title = $2, text = $3, slug = $4
            WHERE id = $1
            RETURNING id, title, text, slug, author_id
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.text)
        .bind(&changes.slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::not_found("Note not found", json!({ "note_id": id })))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
