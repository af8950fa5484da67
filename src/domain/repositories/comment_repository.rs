//! Repository trait for comments.

use crate::domain::entities::{Comment, NewComment};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for comments under news items.
///
/// # Examples
///
/// See integration tests: `tests/repository_comment.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Creates a comment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the news item or author does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_comment: NewComment) -> Result<Comment, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError>;

    /// Lists the comments of a news item, oldest `created` first (ties: lower id first).
    async fn list_for_news(&self, news_id: i64) -> Result<Vec<Comment>, AppError>;

    async fn count_for_news(&self, news_id: i64) -> Result<i64, AppError>;

    /// Replaces the comment text.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the comment does not exist.
    async fn update_text(&self, id: i64, text: &str) -> Result<Comment, AppError>;

    /// Returns `Ok(false)` if the comment did not exist.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}
