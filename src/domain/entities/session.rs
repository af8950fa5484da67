//! Login session entity.

use chrono::{DateTime, Utc};

/// A login session. Only the hash of the cookie token is stored.
#[derive(Debug, Clone)]
pub struct Session {
    pub token_hash: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub token_hash: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            token_hash: "hash".to_string(),
            user_id: 1,
            created_at: Utc::now(),
            expires_at,
        }
    }

    #[test]
    fn test_session_not_expired() {
        assert!(!session(Utc::now() + Duration::hours(1)).is_expired());
    }

    #[test]
    fn test_session_expired() {
        assert!(session(Utc::now() - Duration::seconds(1)).is_expired());
    }

    #[test]
    fn test_session_expires_exactly_at_deadline() {
        let deadline = Utc::now();
        assert!(session(deadline).is_expired_at(deadline));
    }
}
