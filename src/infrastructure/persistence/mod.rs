//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx. Queries
//! are checked at runtime and map rows through private `FromRow` structs.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - User accounts
//! - [`PgSessionRepository`] - Login sessions
//! - [`PgNewsRepository`] - News items (comments cascade on delete)
//! - [`PgCommentRepository`] - Comments joined with author usernames
//! - [`PgNoteRepository`] - Notes with a unique slug constraint

pub mod pg_comment_repository;
pub mod pg_news_repository;
pub mod pg_note_repository;
pub mod pg_session_repository;
pub mod pg_user_repository;

pub use pg_comment_repository::PgCommentRepository;
pub use pg_news_repository::PgNewsRepository;
pub use pg_note_repository::PgNoteRepository;
pub use pg_session_repository::PgSessionRepository;
pub use pg_user_repository::PgUserRepository;
