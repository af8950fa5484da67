//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete storage backends.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`memory`] - In-memory repository implementations

pub mod memory;
pub mod persistence;

use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::{
    CommentRepository, NewsRepository, NoteRepository, SessionRepository, UserRepository,
};
use memory::{
    MemoryCommentRepository, MemoryDatabase, MemoryNewsRepository, MemoryNoteRepository,
    MemorySessionRepository, MemoryUserRepository,
};
use persistence::{
    PgCommentRepository, PgNewsRepository, PgNoteRepository, PgSessionRepository,
    PgUserRepository,
};

/// One storage backend, with every repository behind its trait.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub news: Arc<dyn NewsRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub notes: Arc<dyn NoteRepository>,
    /// Name reported by the health check.
    pub backend: &'static str,
    pool: Option<Arc<PgPool>>,
}

impl Repositories {
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            sessions: Arc::new(PgSessionRepository::new(pool.clone())),
            news: Arc::new(PgNewsRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            notes: Arc::new(PgNoteRepository::new(pool.clone())),
            backend: "postgres",
            pool: Some(pool),
        }
    }

    pub fn in_memory() -> Self {
        let db = Arc::new(MemoryDatabase::new());
        Self {
            users: Arc::new(MemoryUserRepository::new(db.clone())),
            sessions: Arc::new(MemorySessionRepository::new(db.clone())),
            news: Arc::new(MemoryNewsRepository::new(db.clone())),
            comments: Arc::new(MemoryCommentRepository::new(db.clone())),
            notes: Arc::new(MemoryNoteRepository::new(db)),
            backend: "memory",
            pool: None,
        }
    }

    /// The PostgreSQL pool, if this backend has one.
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_deref()
    }

    /// Returns `true` if the storage answers. The in-memory backend always does.
    pub async fn ping(&self) -> bool {
        match &self.pool {
            Some(pool) => sqlx::query("SELECT 1")
                .execute(pool.as_ref())
                .await
                .is_ok(),
            None => true,
        }
    }
}
