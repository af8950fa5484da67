//! In-memory repository implementations.
//!
//! All repositories share one [`MemoryDatabase`] so that cross-table rules
//! hold the same way they do in PostgreSQL: comments carry their author's
//! username, deleting a news item deletes its comments, and note slugs are
//! unique.
//!
//! # Use Cases
//!
//! - Local development without PostgreSQL (`STORAGE=memory`)
//! - HTTP integration tests
//!
//! Data lives only as long as the process.

mod comments;
mod news;
mod notes;
mod sessions;
mod users;

pub use comments::MemoryCommentRepository;
pub use news::MemoryNewsRepository;
pub use notes::MemoryNoteRepository;
pub use sessions::MemorySessionRepository;
pub use users::MemoryUserRepository;

use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::domain::entities::{News, Note, Session, User};

/// Stored comment. The author's username is joined on read.
#[derive(Debug, Clone)]
struct CommentRecord {
    id: i64,
    news_id: i64,
    author_id: i64,
    text: String,
    created: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    sessions: HashMap<String, Session>,
    news: BTreeMap<i64, News>,
    comments: BTreeMap<i64, CommentRecord>,
    notes: BTreeMap<i64, Note>,
    last_user_id: i64,
    last_news_id: i64,
    last_comment_id: i64,
    last_note_id: i64,
}

/// Shared storage behind the in-memory repositories.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    tables: RwLock<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        tracing::debug!("Using in-memory storage");
        Self::default()
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}
