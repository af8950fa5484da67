//! Cookie session middleware.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::Response,
};

use crate::domain::entities::User;
use crate::state::AppState;

/// Name of the cookie holding the raw session token.
pub const SESSION_COOKIE: &str = "session_id";

/// User resolved from the session cookie, stored in request extensions.
///
/// `None` means the visitor is anonymous.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<User>);

/// Extracts the session token from the `Cookie` header.
///
/// Handles multiple cookies in one header; other cookies are ignored.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(SESSION_COOKIE), Some(value)) if !value.is_empty() => {
                    Some(value.to_string())
                }
                _ => None,
            }
        })
}

/// `Set-Cookie` value that opens a session in the browser.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax")
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}

/// Resolves the session cookie into a [`CurrentUser`] for every request.
///
/// Never rejects: unknown, expired or unreadable sessions make the visitor
/// anonymous. Access decisions are left to the
/// [`AuthUser`](crate::web::extract::AuthUser) extractor and the services.
///
/// # Example
///
/// ```rust,ignore
/// let app = web_router
///     .layer(middleware::from_fn_with_state(state.clone(), session::layer));
/// ```
pub async fn layer(State(st): State<AppState>, mut req: Request, next: Next) -> Response {
    let user = match session_token(req.headers()) {
        Some(token) => match st.auth_service.resolve(&token).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed");
                None
            }
        },
        None => None,
    };

    req.extensions_mut().insert(CurrentUser(user));
    next.run(req).await
}
