//! Page route configuration.
//!
//! Access rules are enforced by the handlers: [`AuthUser`] redirects
//! anonymous visitors to the login page, and the services answer 404 to
//! anyone but the owner of a comment or note.
//!
//! [`AuthUser`]: crate::web::extract::AuthUser

use crate::state::AppState;
use crate::web::handlers::{comments, news, notes, users};
use axum::{Router, routing::get};

/// News home, news detail and comment management.
///
/// # Endpoints
///
/// - `GET  /` - Latest news
/// - `GET  /news/{id}` - News detail with comments
/// - `POST /news/{id}` - Post a comment (login)
/// - `GET|POST /news/comments/{id}/edit` - Edit own comment
/// - `GET|POST|DELETE /news/comments/{id}/delete` - Delete own comment
pub fn news_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(news::home_handler))
        .route(
            "/news/{id}",
            get(news::detail_handler).post(news::add_comment_handler),
        )
        .route(
            "/news/comments/{id}/edit",
            get(comments::edit_form_handler).post(comments::edit_handler),
        )
        .route(
            "/news/comments/{id}/delete",
            get(comments::delete_form_handler)
                .post(comments::delete_handler)
                .delete(comments::delete_handler),
        )
}

/// Personal notes.
///
/// # Endpoints
///
/// - `GET  /notes` - Landing page
/// - `GET  /notes/list` - Own notes (login)
/// - `GET|POST /notes/add` - Create a note (login)
/// - `GET  /notes/note/{slug}` - Note detail (owner)
/// - `GET|POST /notes/edit/{slug}` - Edit a note (owner)
/// - `GET|POST /notes/delete/{slug}` - Delete a note (owner)
/// - `GET  /notes/done` - Success page (login)
pub fn notes_routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(notes::home_handler))
        .route("/notes/list", get(notes::list_handler))
        .route(
            "/notes/add",
            get(notes::add_form_handler).post(notes::add_handler),
        )
        .route("/notes/note/{slug}", get(notes::detail_handler))
        .route(
            "/notes/edit/{slug}",
            get(notes::edit_form_handler).post(notes::edit_handler),
        )
        .route(
            "/notes/delete/{slug}",
            get(notes::delete_form_handler).post(notes::delete_handler),
        )
        .route("/notes/done", get(notes::done_handler))
}

/// Login and signup. Rate limited when enabled.
///
/// # Endpoints
///
/// - `GET|POST /auth/login`
/// - `GET|POST /auth/signup`
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/auth/login",
            get(users::login_form_handler).post(users::login_handler),
        )
        .route(
            "/auth/signup",
            get(users::signup_form_handler).post(users::signup_handler),
        )
}

/// Logout. Never rate limited.
///
/// # Endpoints
///
/// - `GET|POST /auth/logout`
pub fn logout_routes() -> Router<AppState> {
    Router::new().route(
        "/auth/logout",
        get(users::logout_handler).post(users::logout_handler),
    )
}
