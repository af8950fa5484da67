//! Authentication service: accounts, login sessions, logout.

use base64::Engine as _;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::{NewSession, NewUser, User};
use crate::domain::repositories::{SessionRepository, UserRepository};
use crate::domain::validation::FormErrors;
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

const SALT_LENGTH_BYTES: usize = 16;
const SESSION_TOKEN_BYTES: usize = 32;

const INVALID_CREDENTIALS: &str = "Пожалуйста, введите правильные имя пользователя и пароль.";
const USERNAME_TAKEN: &str = "Пользователь с таким именем уже существует.";
const USERNAME_REQUIRED: &str = "Обязательное поле.";
const PASSWORD_MISMATCH: &str = "Введенные пароли не совпадают.";
const PASSWORD_TOO_SHORT: &str = "Введённый пароль слишком короткий. Он должен содержать как минимум 8 символов.";

/// Service for user accounts and cookie sessions.
///
/// Passwords are stored as `salt$mac` where `mac` is HMAC-SHA256 keyed by the
/// server secret over the salt and the password. Session tokens are random,
/// handed to the client once, and stored only as HMAC hashes, so a read-only
/// copy of the database cannot be used to forge a session.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    signing_secret: String,
    session_ttl: Duration,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `signing_secret` - HMAC key; changing it invalidates every password and session
    /// - `session_ttl` - lifetime of a login session
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        signing_secret: String,
        session_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            signing_secret,
            session_ttl,
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length")
    }

    /// Hashes a raw session token. Returns 64 lowercase hex characters.
    fn hash_token(&self, token: &str) -> String {
        let mut mac = self.mac();
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = random_bytes::<SALT_LENGTH_BYTES>()?;
        let mut mac = self.mac();
        mac.update(&salt);
        mac.update(password.as_bytes());
        Ok(format!(
            "{}${}",
            hex::encode(salt),
            hex::encode(mac.finalize().into_bytes())
        ))
    }

    /// Constant-time comparison against a stored `salt$mac` value.
    fn verify_password(&self, password: &str, stored: &str) -> bool {
        let Some((salt_hex, mac_hex)) = stored.split_once('$') else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(mac_hex)) else {
            return false;
        };

        let mut mac = self.mac();
        mac.update(&salt);
        mac.update(password.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Form`] with errors on `username` (empty or taken)
    /// and `password` (too short or confirmation mismatch).
    pub async fn signup(
        &self,
        username: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<User, AppError> {
        let username = username.trim();
        let mut errors = FormErrors::new();

        if username.is_empty() {
            errors.add("username", USERNAME_REQUIRED);
        } else if self.users.find_by_username(username).await?.is_some() {
            errors.add("username", USERNAME_TAKEN);
        }

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add("password", PASSWORD_TOO_SHORT);
        }
        if password != confirmation {
            errors.add("password_confirmation", PASSWORD_MISMATCH);
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }

        let new_user = NewUser {
            username: username.to_string(),
            password_hash: self.hash_password(password)?,
        };

        let user = self.users.create(new_user).await.map_err(|e| match e {
            AppError::Conflict { .. } => FormErrors::field("username", USERNAME_TAKEN).into(),
            other => other,
        })?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials and opens a session.
    ///
    /// Returns the user and the raw session token for the cookie.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Form`] with a non-field error on bad credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String), AppError> {
        let user = match self.users.find_by_username(username.trim()).await? {
            Some(user) if self.verify_password(password, &user.password_hash) => user,
            _ => {
                metrics::counter!("logins_failed_total").increment(1);
                tracing::info!("Failed login attempt");
                return Err(FormErrors::non_field(INVALID_CREDENTIALS).into());
            }
        };

        let token = generate_session_token()?;
        self.sessions
            .create(NewSession {
                token_hash: self.hash_token(&token),
                user_id: user.id,
                expires_at: Utc::now() + self.session_ttl,
            })
            .await?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok((user, token))
    }

    /// Closes the session bound to `token`. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.sessions.delete(&self.hash_token(token)).await?;
        Ok(())
    }

    /// Returns the user of a live session, or `None` for unknown or expired tokens.
    ///
    /// Expired sessions are deleted on sight.
    pub async fn resolve(&self, token: &str) -> Result<Option<User>, AppError> {
        let token_hash = self.hash_token(token);

        let Some(session) = self.sessions.find(&token_hash).await? else {
            return Ok(None);
        };

        if session.is_expired() {
            if let Err(e) = self.sessions.delete(&token_hash).await {
                tracing::warn!(
                    error = %e,
                    user_id = session.user_id,
                    "Failed to delete expired session"
                );
            }
            return Ok(None);
        }

        self.users.find_by_id(session.user_id).await
    }

    /// Removes expired sessions. Returns the number removed.
    pub async fn purge_expired_sessions(&self) -> Result<u64, AppError> {
        self.sessions.delete_expired(Utc::now()).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.users.list().await
    }

    pub async fn count_users(&self) -> Result<i64, AppError> {
        self.users.count().await
    }
}

fn random_bytes<const N: usize>() -> Result<[u8; N], AppError> {
    let mut buffer = [0u8; N];
    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Random number generator failure",
            json!({ "reason": e.to_string() }),
        )
    })?;
    Ok(buffer)
}

/// Generates a URL-safe session token (43 characters, 256 bits).
fn generate_session_token() -> Result<String, AppError> {
    let bytes = random_bytes::<SESSION_TOKEN_BYTES>()?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Session;
    use crate::domain::repositories::{MockSessionRepository, MockUserRepository};

    fn test_secret() -> String {
        "test-signing-secret".to_string()
    }

    fn service(users: MockUserRepository, sessions: MockSessionRepository) -> AuthService {
        AuthService::new(
            Arc::new(users),
            Arc::new(sessions),
            test_secret(),
            Duration::hours(1),
        )
    }

    fn user_with_hash(id: i64, username: &str, password_hash: String) -> User {
        User {
            id,
            username: username.to_string(),
            password_hash,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let svc = service(MockUserRepository::new(), MockSessionRepository::new());

        let stored = svc.hash_password("correct horse").unwrap();

        assert!(svc.verify_password("correct horse", &stored));
        assert!(!svc.verify_password("wrong horse", &stored));
    }

    #[test]
    fn test_password_hash_is_salted() {
        let svc = service(MockUserRepository::new(), MockSessionRepository::new());

        let first = svc.hash_password("same password").unwrap();
        let second = svc.hash_password("same password").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let svc = service(MockUserRepository::new(), MockSessionRepository::new());

        assert!(!svc.verify_password("x", "no-separator"));
        assert!(!svc.verify_password("x", "zz$zz"));
    }

    #[test]
    fn test_hash_token_secret_matters() {
        let svc1 = service(MockUserRepository::new(), MockSessionRepository::new());
        let svc2 = AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockSessionRepository::new()),
            "other-secret".to_string(),
            Duration::hours(1),
        );

        assert_eq!(svc1.hash_token("token"), svc1.hash_token("token"));
        assert_eq!(svc1.hash_token("token").len(), 64);
        assert_ne!(svc1.hash_token("token"), svc2.hash_token("token"));
    }

    #[test]
    fn test_session_token_shape() {
        let token = generate_session_token().unwrap();
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[tokio::test]
    async fn test_signup_success() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .withf(|name| name == "Автор")
            .times(1)
            .returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|new_user| new_user.username == "Автор" && new_user.password_hash.contains('$'))
            .times(1)
            .returning(|new_user| Ok(user_with_hash(1, &new_user.username, new_user.password_hash)));

        let svc = service(users, MockSessionRepository::new());

        let user = svc.signup(" Автор ", "long-password", "long-password").await.unwrap();
        assert_eq!(user.username, "Автор");
    }

    #[tokio::test]
    async fn test_signup_collects_field_errors() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .times(1)
            .returning(|name| Ok(Some(user_with_hash(1, name, String::new()))));
        users.expect_create().times(0);

        let svc = service(users, MockSessionRepository::new());

        let err = svc.signup("Автор", "short", "other").await.unwrap_err();
        let errors = err.as_form_errors().expect("form errors");

        assert_eq!(errors.for_field("username"), vec![USERNAME_TAKEN]);
        assert_eq!(errors.for_field("password"), vec![PASSWORD_TOO_SHORT]);
        assert_eq!(errors.for_field("password_confirmation"), vec![PASSWORD_MISMATCH]);
    }

    #[tokio::test]
    async fn test_login_creates_session() {
        let hashing = service(MockUserRepository::new(), MockSessionRepository::new());
        let stored = hashing.hash_password("long-password").unwrap();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .times(1)
            .returning(move |name| Ok(Some(user_with_hash(4, name, stored.clone()))));

        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_create()
            .withf(|s| s.user_id == 4 && s.token_hash.len() == 64)
            .times(1)
            .returning(|s| {
                Ok(Session {
                    token_hash: s.token_hash,
                    user_id: s.user_id,
                    created_at: Utc::now(),
                    expires_at: s.expires_at,
                })
            });

        let svc = service(users, sessions);

        let (user, token) = svc.login("Автор", "long-password").await.unwrap();
        assert_eq!(user.id, 4);
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let hashing = service(MockUserRepository::new(), MockSessionRepository::new());
        let stored = hashing.hash_password("long-password").unwrap();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .times(1)
            .returning(move |name| Ok(Some(user_with_hash(4, name, stored.clone()))));

        let mut sessions = MockSessionRepository::new();
        sessions.expect_create().times(0);

        let svc = service(users, sessions);

        let err = svc.login("Автор", "wrong-password").await.unwrap_err();
        let errors = err.as_form_errors().expect("form errors");
        assert_eq!(errors.non_field_errors(), vec![INVALID_CREDENTIALS]);
    }

    #[tokio::test]
    async fn test_resolve_expired_session_is_deleted() {
        let mut sessions = MockSessionRepository::new();
        sessions.expect_find().times(1).returning(|hash| {
            Ok(Some(Session {
                token_hash: hash.to_string(),
                user_id: 1,
                created_at: Utc::now() - Duration::hours(2),
                expires_at: Utc::now() - Duration::hours(1),
            }))
        });
        sessions.expect_delete().times(1).returning(|_| Ok(true));

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(0);

        let svc = service(users, sessions);

        assert_eq!(svc.resolve("stale-token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_expired_session_ignores_delete_failure() {
        let mut sessions = MockSessionRepository::new();
        sessions.expect_find().times(1).returning(|hash| {
            Ok(Some(Session {
                token_hash: hash.to_string(),
                user_id: 1,
                created_at: Utc::now() - Duration::hours(2),
                expires_at: Utc::now() - Duration::hours(1),
            }))
        });
        sessions
            .expect_delete()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(0);

        let svc = service(users, sessions);

        assert_eq!(svc.resolve("stale-token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_unknown_token() {
        let mut sessions = MockSessionRepository::new();
        sessions.expect_find().times(1).returning(|_| Ok(None));

        let svc = service(MockUserRepository::new(), sessions);

        assert_eq!(svc.resolve("unknown").await.unwrap(), None);
    }
}
