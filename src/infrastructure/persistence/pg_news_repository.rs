//! PostgreSQL implementation of news repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewNews, News};
use crate::domain::repositories::NewsRepository;
use crate::error::AppError;

/// PostgreSQL repository for news items.
///
/// Comments reference news with `ON DELETE CASCADE`, so deleting a news item
/// removes its comments in the same statement.
pub struct PgNewsRepository {
    pool: Arc<PgPool>,
}

impl PgNewsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct NewsRow {
    id: i64,
    title: String,
    text: String,
    date: NaiveDate,
}

impl From<NewsRow> for News {
    fn from(row: NewsRow) -> Self {
        News {
            id: row.id,
            title: row.title,
            text: row.text,
            date: row.date,
        }
    }
}

#[async_trait]
impl NewsRepository for PgNewsRepository {
    async fn create(&self, new_news: NewNews) -> Result<News, AppError> {
        let row = sqlx::query_as::<_, NewsRow>(
            r#"
            INSERT INTO news (title, text, date)
            VALUES ($1, $2, $3)
            RETURNING id, title, text, date
            "#,
        )
        .bind(&new_news.title)
        .bind(&new_news.text)
        .bind(new_news.date)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<News>, AppError> {
        let row = sqlx::query_as::<_, NewsRow>(
            r#"
            SELECT id, title, text, date
            FROM news
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn latest(&self, limit: i64) -> Result<Vec<News>, AppError> {
        let rows = sqlx::query_as::<_, NewsRow>(
            r#"
            SELECT id, title, text, date
            FROM news
            ORDER BY date DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM news WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM news")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
