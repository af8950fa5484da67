//! Domain layer containing business entities and rules.
//!
//! The domain layer has no dependencies on the web or persistence layers.
//! Repository traits define the contracts the infrastructure layer implements.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`moderation`] - Banned-word check for comment text
//! - [`slug`] - Slug derivation and uniqueness for notes
//! - [`access`] - Ownership check for comments and notes
//! - [`validation`] - Field-scoped errors produced by the rules above

pub mod access;
pub mod entities;
pub mod moderation;
pub mod repositories;
pub mod slug;
pub mod validation;
