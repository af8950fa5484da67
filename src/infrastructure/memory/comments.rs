use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::{CommentRecord, MemoryDatabase, Tables, next_id};
use crate::domain::entities::{Comment, NewComment};
use crate::domain::repositories::CommentRepository;
use crate::error::AppError;

pub struct MemoryCommentRepository {
    db: Arc<MemoryDatabase>,
}

impl MemoryCommentRepository {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

fn joined(tables: &Tables, record: &CommentRecord) -> Comment {
    let author_username = tables
        .users
        .get(&record.author_id)
        .map(|u| u.username.clone())
        .unwrap_or_default();

    Comment {
        id: record.id,
        news_id: record.news_id,
        author_id: record.author_id,
        author_username,
        text: record.text.clone(),
        created: record.created,
    }
}

#[async_trait]
impl CommentRepository for MemoryCommentRepository {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, AppError> {
        let mut tables = self.db.tables.write().await;

        if !tables.news.contains_key(&new_comment.news_id)
            || !tables.users.contains_key(&new_comment.author_id)
        {
            return Err(AppError::not_found(
                "Referenced record not found",
                json!({ "news_id": new_comment.news_id, "author_id": new_comment.author_id }),
            ));
        }

        let record = CommentRecord {
            id: next_id(&mut tables.last_comment_id),
            news_id: new_comment.news_id,
            author_id: new_comment.author_id,
            text: new_comment.text,
            created: new_comment.created,
        };
        let comment = joined(&tables, &record);
        tables.comments.insert(record.id, record);
        Ok(comment)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError> {
        let tables = self.db.tables.read().await;
        Ok(tables.comments.get(&id).map(|r| joined(&tables, r)))
    }

    async fn list_for_news(&self, news_id: i64) -> Result<Vec<Comment>, AppError> {
        let tables = self.db.tables.read().await;
        let mut records: Vec<&CommentRecord> = tables
            .comments
            .values()
            .filter(|c| c.news_id == news_id)
            .collect();
        records.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(records.into_iter().map(|r| joined(&tables, r)).collect())
    }

    async fn count_for_news(&self, news_id: i64) -> Result<i64, AppError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.news_id == news_id)
            .count() as i64)
    }

    async fn update_text(&self, id: i64, text: &str) -> Result<Comment, AppError> {
        let mut tables = self.db.tables.write().await;

        let record = match tables.comments.get_mut(&id) {
            Some(record) => {
                record.text = text.to_string();
                record.clone()
            }
            None => {
                return Err(AppError::not_found(
                    "Comment not found",
                    json!({ "comment_id": id }),
                ));
            }
        };

        Ok(joined(&tables, &record))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self
            .db
            .tables
            .write()
            .await
            .comments
            .remove(&id)
            .is_some())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.db.tables.read().await.comments.len() as i64)
    }
}
