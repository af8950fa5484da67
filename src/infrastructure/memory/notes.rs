use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::{MemoryDatabase, next_id};
use crate::domain::entities::{NewNote, Note, NoteChanges};
use crate::domain::repositories::NoteRepository;
use crate::error::AppError;

pub struct MemoryNoteRepository {
    db: Arc<MemoryDatabase>,
}

impl MemoryNoteRepository {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

fn slug_conflict() -> AppError {
    AppError::conflict(
        "Unique constraint violation",
        json!({ "constraint": "notes_slug_key" }),
    )
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn create(&self, new_note: NewNote) -> Result<Note, AppError> {
        let mut tables = self.db.tables.write().await;

        if !tables.users.contains_key(&new_note.author_id) {
            return Err(AppError::not_found(
                "Referenced record not found",
                json!({ "author_id": new_note.author_id }),
            ));
        }

        if tables.notes.values().any(|n| n.slug == new_note.slug) {
            return Err(slug_conflict());
        }

        let note = Note {
            id: next_id(&mut tables.last_note_id),
            title: new_note.title,
            text: new_note.text,
            slug: new_note.slug,
            author_id: new_note.author_id,
        };
        tables.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Note>, AppError> {
        let tables = self.db.tables.read().await;
        Ok(tables.notes.values().find(|n| n.slug == slug).cloned())
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Note>, AppError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .notes
            .values()
            .filter(|n| n.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, changes: NoteChanges) -> Result<Note, AppError> {
        let mut tables = self.db.tables.write().await;

        if tables
            .notes
            .values()
            .any(|n| n.id != id && n.slug == changes.slug)
        {
            return Err(slug_conflict());
        }

        let note = tables
            .notes
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Note not found", json!({ "note_id": id })))?;
        note.title = changes.title;
        note.text = changes.text;
        note.slug = changes.slug;
        Ok(note.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.db.tables.write().await.notes.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.db.tables.read().await.notes.len() as i64)
    }
}
