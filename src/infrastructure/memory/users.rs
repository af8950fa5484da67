use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use super::{MemoryDatabase, next_id};
use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

pub struct MemoryUserRepository {
    db: Arc<MemoryDatabase>,
}

impl MemoryUserRepository {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tables = self.db.tables.write().await;

        if tables
            .users
            .values()
            .any(|u| u.username == new_user.username)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "users_username_key" }),
            ));
        }

        let user = User {
            id: next_id(&mut tables.last_user_id),
            username: new_user.username,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.db.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.db.tables.read().await.users.values().cloned().collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.db.tables.read().await.users.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "salt$mac".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let repo = MemoryUserRepository::new(Arc::new(MemoryDatabase::new()));

        let first = repo.create(new_user("Автор")).await.unwrap();
        assert_eq!(first.id, 1);

        let err = repo.create(new_user("Автор")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let repo = MemoryUserRepository::new(Arc::new(MemoryDatabase::new()));
        repo.create(new_user("Автор")).await.unwrap();

        assert!(repo.find_by_username("Автор").await.unwrap().is_some());
        assert!(repo.find_by_username("Читатель").await.unwrap().is_none());
    }
}
