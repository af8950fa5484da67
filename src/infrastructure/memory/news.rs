use async_trait::async_trait;
use std::sync::Arc;

use super::{MemoryDatabase, next_id};
use crate::domain::entities::{NewNews, News};
use crate::domain::repositories::NewsRepository;
use crate::error::AppError;

pub struct MemoryNewsRepository {
    db: Arc<MemoryDatabase>,
}

impl MemoryNewsRepository {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NewsRepository for MemoryNewsRepository {
    async fn create(&self, new_news: NewNews) -> Result<News, AppError> {
        let mut tables = self.db.tables.write().await;
        let news = News {
            id: next_id(&mut tables.last_news_id),
            title: new_news.title,
            text: new_news.text,
            date: new_news.date,
        };
        tables.news.insert(news.id, news.clone());
        Ok(news)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<News>, AppError> {
        Ok(self.db.tables.read().await.news.get(&id).cloned())
    }

    async fn latest(&self, limit: i64) -> Result<Vec<News>, AppError> {
        let tables = self.db.tables.read().await;
        let mut all: Vec<News> = tables.news.values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        all.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(all)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.db.tables.write().await;
        if tables.news.remove(&id).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|_, c| c.news_id != id);
        Ok(true)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.db.tables.read().await.news.len() as i64)
    }
}
