//! Web layer: server-rendered HTML pages for news, comments, notes and accounts.
//!
//! Uses Askama templates for server-side rendering.
//!
//! # Modules
//!
//! - [`extract`] - Current visitor extractors (`MaybeUser`, `AuthUser`)
//! - [`forms`] - Submitted form bodies and their validation
//! - [`handlers`] - Template rendering handlers
//! - [`middleware`] - Cookie session middleware
//! - [`routes`] - Page route configuration

pub mod extract;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod routes;
