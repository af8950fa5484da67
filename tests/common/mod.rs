#![allow(dead_code)]

use axum_test::TestServer;
use chrono::NaiveDate;
use ya_portal::application::services::NoteDraft;
use ya_portal::domain::entities::{Comment, News, Note, User};
use ya_portal::domain::moderation::BannedWords;
use ya_portal::infrastructure::Repositories;
use ya_portal::routes::{RouterOptions, build_router};
use ya_portal::state::{AppSettings, AppState};

pub const PASSWORD: &str = "correct-horse-42";
pub const NOTE_TITLE: &str = "Заголовок";
pub const NOTE_TEXT: &str = "Текст заметки";
pub const NOTE_SLUG: &str = "note-slug";

pub fn test_settings() -> AppSettings {
    AppSettings {
        session_secret: "test-secret".to_string(),
        session_ttl: chrono::Duration::hours(1),
        banned_words: BannedWords::default(),
        news_count_on_home_page: 10,
    }
}

/// Services over a fresh in-memory backend.
pub fn create_test_state() -> AppState {
    AppState::new(Repositories::in_memory(), test_settings())
}

/// Full page router without rate limiting (the test transport has no peer address).
pub fn create_test_server(state: &AppState) -> TestServer {
    TestServer::new(build_router(
        state.clone(),
        RouterOptions {
            behind_proxy: false,
            rate_limit: false,
        },
    ))
    .unwrap()
}

pub async fn create_user(state: &AppState, username: &str) -> User {
    state
        .auth_service
        .signup(username, PASSWORD, PASSWORD)
        .await
        .unwrap()
}

/// `Cookie` header value of a fresh session for `user`.
pub async fn login_cookie(state: &AppState, user: &User) -> String {
    let (_, token) = state
        .auth_service
        .login(&user.username, PASSWORD)
        .await
        .unwrap();
    format!("session_id={token}")
}

pub async fn create_news(state: &AppState, title: &str, date: NaiveDate) -> News {
    state
        .news_service
        .create_news(title, "Просто текст.", Some(date))
        .await
        .unwrap()
}

pub async fn create_comment(state: &AppState, news: &News, author: &User, text: &str) -> Comment {
    state
        .news_service
        .add_comment(news.id, author, text)
        .await
        .unwrap()
}

pub async fn create_note(state: &AppState, author: &User, slug: &str) -> Note {
    state
        .note_service
        .create(
            author,
            NoteDraft {
                title: NOTE_TITLE.to_string(),
                text: NOTE_TEXT.to_string(),
                slug: Some(slug.to_string()),
            },
        )
        .await
        .unwrap()
}

/// Value of the `Location` header of a redirect response.
pub fn location(response: &axum_test::TestResponse) -> String {
    response
        .header("location")
        .to_str()
        .unwrap()
        .to_string()
}
