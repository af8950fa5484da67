//! Business logic services for the application layer.

pub mod auth_service;
pub mod news_service;
pub mod note_service;

pub use auth_service::AuthService;
pub use news_service::{NewsDetail, NewsPreview, NewsService};
pub use note_service::{NoteDraft, NoteService};
