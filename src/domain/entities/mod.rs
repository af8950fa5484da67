//! Core domain entities.
//!
//! Entities are plain data structures. Each persisted entity has a separate
//! `New*` struct carrying the fields supplied on creation.
//!
//! # Entity Types
//!
//! - [`User`] - An account that owns comments and notes
//! - [`Session`] - A login session bound to a cookie token
//! - [`News`] - A news item, created administratively
//! - [`Comment`] - A comment under a news item
//! - [`Note`] - A personal note addressed by its slug

pub mod comment;
pub mod news;
pub mod note;
pub mod session;
pub mod user;

pub use comment::{Comment, NewComment};
pub use news::{News, NewNews};
pub use note::{NewNote, Note, NoteChanges};
pub use session::{NewSession, Session};
pub use user::{NewUser, User};
