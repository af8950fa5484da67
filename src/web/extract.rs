//! Request extractors for the current visitor.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::request::Parts,
    response::Redirect,
};
use std::convert::Infallible;

use crate::domain::entities::User;
use crate::web::middleware::session::CurrentUser;

/// Login page path.
pub const LOGIN_PATH: &str = "/auth/login";

fn current_user(parts: &Parts) -> Option<User> {
    parts
        .extensions
        .get::<CurrentUser>()
        .and_then(|current| current.0.clone())
}

/// Login URL that brings the user back to `path` afterwards.
pub fn login_url(path: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("next", path)
        .finish();
    format!("{LOGIN_PATH}?{query}")
}

/// The visitor, authenticated or not.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn username(&self) -> Option<String> {
        self.0.as_ref().map(|u| u.username.clone())
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(current_user(parts)))
    }
}

/// An authenticated user. Anonymous visitors are redirected to the login page
/// with `next` set to the requested path.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = current_user(parts) {
            return Ok(AuthUser(user));
        }

        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| &original.0)
            .unwrap_or(&parts.uri);
        let path = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());

        tracing::debug!(path, "Anonymous visitor redirected to login");
        Err(Redirect::to(&login_url(path)))
    }
}
