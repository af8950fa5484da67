//! HTTP request handlers for machine-facing endpoints.

pub mod health;

pub use health::health_handler;
