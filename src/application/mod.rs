//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls with the domain rules (moderation,
//! slug assignment, ownership) and give handlers a small API.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Signup, login sessions, logout
//! - [`services::news_service::NewsService`] - News pages and comment moderation
//! - [`services::note_service::NoteService`] - Personal notes with slug assignment

pub mod services;
