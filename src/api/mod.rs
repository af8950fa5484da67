//! Machine-facing HTTP layer: health endpoint and shared middleware.
//!
//! # Modules
//!
//! - [`dto`] - Response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Tracing and rate limiting

pub mod dto;
pub mod handlers;
pub mod middleware;
