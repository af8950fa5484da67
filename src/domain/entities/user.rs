//! User account entity.

use chrono::{DateTime, Utc};

/// A registered user.
///
/// `password_hash` has the form `<salt-hex>$<mac-hex>`; see
/// [`crate::application::services::AuthService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}
