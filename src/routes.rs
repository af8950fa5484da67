//! Top-level router configuration combining page and API routes.
//!
//! # Route Structure
//!
//! - `/`, `/news/*`   - News and comments
//! - `/notes/*`       - Personal notes
//! - `/auth/*`        - Login, logout, signup
//! - `GET /health`    - Health check: storage, moderation (public)
//! - `/static/*`      - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Session** - Resolves the `session_id` cookie into the current user
//! - **Rate limiting** - Per-IP token bucket on login and signup (optional)
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::middleware::session;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Deployment switches that change the middleware stack.
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    /// When `true`, rate limiting reads the client IP from `X-Forwarded-For` /
    /// `X-Real-IP` headers instead of the peer socket address; enable only
    /// when the service runs behind a trusted reverse proxy.
    pub behind_proxy: bool,
    /// Rate limit login and signup. Requires connect info on the server.
    pub rate_limit: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            behind_proxy: false,
            rate_limit: true,
        }
    }
}

/// Constructs the router with all routes and middleware, without path
/// normalization.
pub fn build_router(state: AppState, options: RouterOptions) -> Router {
    let auth = match (options.rate_limit, options.behind_proxy) {
        (false, _) => web::routes::auth_routes(),
        (true, false) => web::routes::auth_routes().layer(rate_limit::auth_layer()),
        (true, true) => web::routes::auth_routes().layer(rate_limit::auth_layer_behind_proxy()),
    };

    let pages = Router::new()
        .merge(web::routes::news_routes())
        .merge(web::routes::notes_routes())
        .merge(web::routes::logout_routes())
        .merge(auth)
        .layer(middleware::from_fn_with_state(state.clone(), session::layer));

    Router::new()
        .merge(pages)
        .route("/health", get(health_handler))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application service: [`build_router`] wrapped in
/// trailing-slash normalization, so `/notes/add/` and `/notes/add` match.
pub fn app_router(state: AppState, options: RouterOptions) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, options))
}
