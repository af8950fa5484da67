//! Repository trait for login sessions.

use crate::domain::entities::{NewSession, Session};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for login sessions.
///
/// Sessions are keyed by the HMAC hash of the cookie token; the raw token is
/// never stored.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, new_session: NewSession) -> Result<Session, AppError>;

    async fn find(&self, token_hash: &str) -> Result<Option<Session>, AppError>;

    /// Deletes a session. Returns `Ok(false)` if it did not exist.
    async fn delete(&self, token_hash: &str) -> Result<bool, AppError>;

    /// Deletes every session that expired before `now`. Returns the number removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}
