use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::MemoryDatabase;
use crate::domain::entities::{NewSession, Session};
use crate::domain::repositories::SessionRepository;
use crate::error::AppError;

pub struct MemorySessionRepository {
    db: Arc<MemoryDatabase>,
}

impl MemorySessionRepository {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn create(&self, new_session: NewSession) -> Result<Session, AppError> {
        let session = Session {
            token_hash: new_session.token_hash,
            user_id: new_session.user_id,
            created_at: Utc::now(),
            expires_at: new_session.expires_at,
        };

        self.db
            .tables
            .write()
            .await
            .sessions
            .insert(session.token_hash.clone(), session.clone());
        Ok(session)
    }

    async fn find(&self, token_hash: &str) -> Result<Option<Session>, AppError> {
        Ok(self.db.tables.read().await.sessions.get(token_hash).cloned())
    }

    async fn delete(&self, token_hash: &str) -> Result<bool, AppError> {
        Ok(self
            .db
            .tables
            .write()
            .await
            .sessions
            .remove(token_hash)
            .is_some())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut tables = self.db.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| !s.is_expired_at(now));
        Ok((before - tables.sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_delete_expired_keeps_live_sessions() {
        let repo = MemorySessionRepository::new(Arc::new(MemoryDatabase::new()));
        let now = Utc::now();

        for (hash, offset) in [("old", -1), ("fresh", 1)] {
            repo.create(NewSession {
                token_hash: hash.to_string(),
                user_id: 1,
                expires_at: now + Duration::hours(offset),
            })
            .await
            .unwrap();
        }

        assert_eq!(repo.delete_expired(now).await.unwrap(), 1);
        assert!(repo.find("old").await.unwrap().is_none());
        assert!(repo.find("fresh").await.unwrap().is_some());
    }
}
