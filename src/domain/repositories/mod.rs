//! Repository trait definitions for the domain layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - PostgreSQL implementations live in `crate::infrastructure::persistence`
//! - In-memory implementations live in `crate::infrastructure::memory`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - User accounts
//! - [`SessionRepository`] - Login sessions
//! - [`NewsRepository`] - News items
//! - [`CommentRepository`] - Comments under news
//! - [`NoteRepository`] - Personal notes

pub mod comment_repository;
pub mod news_repository;
pub mod note_repository;
pub mod session_repository;
pub mod user_repository;

pub use comment_repository::CommentRepository;
pub use news_repository::NewsRepository;
pub use note_repository::NoteRepository;
pub use session_repository::SessionRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use comment_repository::MockCommentRepository;
#[cfg(test)]
pub use news_repository::MockNewsRepository;
#[cfg(test)]
pub use note_repository::MockNoteRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
