//! Repository trait for news items.

use crate::domain::entities::{NewNews, News};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for news items.
///
/// # Examples
///
/// See integration tests: `tests/repository_news.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsRepository: Send + Sync {
    async fn create(&self, new_news: NewNews) -> Result<News, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<News>, AppError>;

    /// Returns up to `limit` news, newest `date` first (ties: higher id first).
    async fn latest(&self, limit: i64) -> Result<Vec<News>, AppError>;

    /// Deletes a news item together with its comments.
    ///
    /// Returns `Ok(false)` if the news item did not exist.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}
