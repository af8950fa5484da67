//! News entity.

use chrono::NaiveDate;

/// A news item. News are created administratively and only read by the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub date: NaiveDate,
}

/// Input data for creating a news item.
#[derive(Debug, Clone)]
pub struct NewNews {
    pub title: String,
    pub text: String,
    pub date: NaiveDate,
}
