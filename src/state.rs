//! Shared application state injected into every handler.

use chrono::Duration;
use std::sync::Arc;

use crate::application::services::{AuthService, NewsService, NoteService};
use crate::domain::moderation::{BannedWords, ContentValidator};
use crate::infrastructure::Repositories;

/// Service settings that do not depend on the storage backend.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub session_secret: String,
    pub session_ttl: Duration,
    pub banned_words: BannedWords,
    pub news_count_on_home_page: i64,
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub news_service: Arc<NewsService>,
    pub note_service: Arc<NoteService>,
    pub repositories: Repositories,
}

impl AppState {
    /// Wires the services on top of one storage backend.
    pub fn new(repositories: Repositories, settings: AppSettings) -> Self {
        let auth_service = Arc::new(AuthService::new(
            repositories.users.clone(),
            repositories.sessions.clone(),
            settings.session_secret,
            settings.session_ttl,
        ));

        let news_service = Arc::new(NewsService::new(
            repositories.news.clone(),
            repositories.comments.clone(),
            ContentValidator::new(settings.banned_words),
            settings.news_count_on_home_page,
        ));

        let note_service = Arc::new(NoteService::new(repositories.notes.clone()));

        Self {
            auth_service,
            news_service,
            note_service,
            repositories,
        }
    }
}
