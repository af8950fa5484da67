//! Comment entity.

use chrono::{DateTime, Utc};

use crate::domain::access::Owned;

/// A comment under a news item.
///
/// `author_username` is joined from the users table for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub news_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl Owned for Comment {
    fn owner_id(&self) -> i64 {
        self.author_id
    }
}

/// Input data for creating a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub news_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
}
