//! Personal notes addressed by slug.

use serde_json::json;
use std::sync::Arc;

use crate::domain::access::can_mutate;
use crate::domain::entities::{NewNote, Note, NoteChanges, User};
use crate::domain::repositories::NoteRepository;
use crate::domain::slug::IdentifierAssigner;
use crate::domain::validation::ValidationError;
use crate::error::AppError;

/// Submitted note fields. A missing or blank `slug` is derived from the title.
#[derive(Debug, Clone)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub slug: Option<String>,
}

/// Service for creating, reading, updating and deleting personal notes.
pub struct NoteService {
    notes: Arc<dyn NoteRepository>,
    assigner: IdentifierAssigner,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteRepository>) -> Self {
        Self {
            notes,
            assigner: IdentifierAssigner::new(),
        }
    }

    /// Notes of `user`, ordered by id. Other users' notes are never included.
    pub async fn list_for(&self, user: &User) -> Result<Vec<Note>, AppError> {
        self.notes.list_by_author(user.id).await
    }

    /// Creates a note owned by `author`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Form`] with a `slug` error when the slug is malformed
    /// or taken, or a `title` error when no slug can be derived from the title.
    pub async fn create(&self, author: &User, draft: NoteDraft) -> Result<Note, AppError> {
        let slug = self
            .assigner
            .assign(
                self.notes.as_ref(),
                &draft.title,
                draft.slug.as_deref(),
                None,
            )
            .await?;

        let note = self
            .notes
            .create(NewNote {
                title: draft.title,
                text: draft.text,
                slug: slug.clone(),
                author_id: author.id,
            })
            .await
            .map_err(|e| slug_race(e, slug))?;

        metrics::counter!("notes_created_total").increment(1);
        tracing::info!(note_id = note.id, author_id = author.id, slug = %note.slug, "Note created");
        Ok(note)
    }

    /// Loads a note by slug for its author.
    ///
    /// A note owned by someone else is reported exactly like a missing one.
    pub async fn note_for_owner(&self, slug: &str, user: &User) -> Result<Note, AppError> {
        match self.notes.find_by_slug(slug).await? {
            Some(note) if can_mutate(user.id, &note) => Ok(note),
            _ => Err(AppError::not_found(
                "Note not found",
                json!({ "slug": slug }),
            )),
        }
    }

    /// Replaces title, text and slug of the user's own note. The author never changes.
    pub async fn update(&self, slug: &str, user: &User, draft: NoteDraft) -> Result<Note, AppError> {
        let note = self.note_for_owner(slug, user).await?;

        let new_slug = self
            .assigner
            .assign(
                self.notes.as_ref(),
                &draft.title,
                draft.slug.as_deref(),
                Some(note.id),
            )
            .await?;

        let updated = self
            .notes
            .update(
                note.id,
                NoteChanges {
                    title: draft.title,
                    text: draft.text,
                    slug: new_slug.clone(),
                },
            )
            .await
            .map_err(|e| slug_race(e, new_slug))?;

        tracing::info!(note_id = note.id, author_id = user.id, "Note updated");
        Ok(updated)
    }

    /// Deletes the user's own note. Returns the note as it was.
    pub async fn delete(&self, slug: &str, user: &User) -> Result<Note, AppError> {
        let note = self.note_for_owner(slug, user).await?;
        self.notes.delete(note.id).await?;
        tracing::info!(note_id = note.id, author_id = user.id, "Note deleted");
        Ok(note)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        self.notes.count().await
    }
}

/// The unique constraint is the last word when two writers pass the check at once.
fn slug_race(error: AppError, slug: String) -> AppError {
    match error {
        AppError::Conflict { .. } => ValidationError::IdentifierConflict { slug }.into(),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockNoteRepository;
    use crate::domain::slug::SLUG_CONFLICT_SUFFIX;
    use chrono::Utc;

    fn user(id: i64) -> User {
        User {
            id,
            username: format!("user{id}"),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    fn note(id: i64, slug: &str, author_id: i64) -> Note {
        Note {
            id,
            title: "Заголовок".to_string(),
            text: "Текст".to_string(),
            slug: slug.to_string(),
            author_id,
        }
    }

    fn draft(title: &str, slug: Option<&str>) -> NoteDraft {
        NoteDraft {
            title: title.to_string(),
            text: "Текст заметки".to_string(),
            slug: slug.map(str::to_string),
        }
    }

    fn echo_create(repo: &mut MockNoteRepository) {
        repo.expect_create().returning(|n| {
            Ok(Note {
                id: 1,
                title: n.title,
                text: n.text,
                slug: n.slug,
                author_id: n.author_id,
            })
        });
    }

    #[tokio::test]
    async fn test_create_with_explicit_slug() {
        let mut repo = MockNoteRepository::new();
        repo.expect_find_by_slug().returning(|_| Ok(None));
        echo_create(&mut repo);

        let note = NoteService::new(Arc::new(repo))
            .create(&user(1), draft("Заголовок", Some("new_slug")))
            .await
            .unwrap();

        assert_eq!(note.slug, "new_slug");
        assert_eq!(note.author_id, 1);
    }

    #[tokio::test]
    async fn test_create_derives_slug_from_title() {
        let mut repo = MockNoteRepository::new();
        repo.expect_find_by_slug()
            .withf(|slug| slug == "novyij-zagolovok")
            .returning(|_| Ok(None));
        echo_create(&mut repo);

        let note = NoteService::new(Arc::new(repo))
            .create(&user(1), draft("Новый заголовок", None))
            .await
            .unwrap();

        assert_eq!(note.slug, "novyij-zagolovok");
    }

    #[tokio::test]
    async fn test_create_with_taken_slug() {
        let mut repo = MockNoteRepository::new();
        repo.expect_find_by_slug()
            .returning(|slug| Ok(Some(note(9, slug, 2))));
        repo.expect_create().times(0);

        let err = NoteService::new(Arc::new(repo))
            .create(&user(1), draft("Заголовок", Some("taken")))
            .await
            .unwrap_err();

        assert_eq!(
            err.as_form_errors().map(|e| e.for_field("slug")),
            Some(vec![format!("taken{SLUG_CONFLICT_SUFFIX}")])
        );
    }

    #[tokio::test]
    async fn test_create_race_on_unique_constraint() {
        let mut repo = MockNoteRepository::new();
        repo.expect_find_by_slug().returning(|_| Ok(None));
        repo.expect_create()
            .returning(|_| Err(AppError::conflict("Unique constraint violation", json!({}))));

        let err = NoteService::new(Arc::new(repo))
            .create(&user(1), draft("Заголовок", Some("racy")))
            .await
            .unwrap_err();

        assert_eq!(
            err.as_form_errors().map(|e| e.for_field("slug")),
            Some(vec![format!("racy{SLUG_CONFLICT_SUFFIX}")])
        );
    }

    #[tokio::test]
    async fn test_foreign_note_is_not_found() {
        let mut repo = MockNoteRepository::new();
        repo.expect_find_by_slug()
            .returning(|slug| Ok(Some(note(1, slug, 1))));
        repo.expect_update().times(0);
        repo.expect_delete().times(0);

        let service = NoteService::new(Arc::new(repo));
        let reader = user(2);

        assert!(matches!(
            service.note_for_owner("slug", &reader).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            service.update("slug", &reader, draft("X", None)).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete("slug", &reader).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_keeps_own_slug() {
        let mut repo = MockNoteRepository::new();
        repo.expect_find_by_slug()
            .returning(|slug| Ok(Some(note(4, slug, 1))));
        repo.expect_update()
            .withf(|id, changes| *id == 4 && changes.slug == "same")
            .times(1)
            .returning(|id, changes| {
                Ok(Note {
                    id,
                    title: changes.title,
                    text: changes.text,
                    slug: changes.slug,
                    author_id: 1,
                })
            });

        let updated = NoteService::new(Arc::new(repo))
            .update("same", &user(1), draft("Новый заголовок", Some("same")))
            .await
            .unwrap();

        assert_eq!(updated.title, "Новый заголовок");
        assert_eq!(updated.author_id, 1);
    }

    #[tokio::test]
    async fn test_delete_own_note() {
        let mut repo = MockNoteRepository::new();
        repo.expect_find_by_slug()
            .returning(|slug| Ok(Some(note(4, slug, 1))));
        repo.expect_delete()
            .withf(|id| *id == 4)
            .times(1)
            .returning(|_| Ok(true));

        let deleted = NoteService::new(Arc::new(repo))
            .delete("mine", &user(1))
            .await
            .unwrap();

        assert_eq!(deleted.slug, "mine");
    }
}
