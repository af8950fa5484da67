//! Repository trait for notes.

use crate::domain::entities::{NewNote, Note, NoteChanges};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for personal notes.
///
/// The slug is unique across all notes; implementations reject duplicates with
/// [`AppError::Conflict`], which is the final authority when two submissions
/// race past the service-level check.
///
/// # Examples
///
/// See integration tests: `tests/repository_note.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn create(&self, new_note: NewNote) -> Result<Note, AppError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Note>, AppError>;

    /// Lists the notes of one author ordered by id.
    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Note>, AppError>;

    /// Replaces title, text and slug of a note.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the note does not exist.
    /// Returns [`AppError::Conflict`] if the new slug is taken.
    async fn update(&self, id: i64, changes: NoteChanges) -> Result<Note, AppError>;

    /// Returns `Ok(false)` if the note did not exist.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}
