//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::UrlRepository`] trait
//! and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::registry::Registry`] - One record per normalized URL, race-safe
//! - [`services::key_assigner::KeyAssigner`] - Writes auto and custom keys
//! - [`services::resolver::Resolver`] - Key to URL lookup
//! - [`services::shorten_service::ShortenService`] - Write and read paths end to end

pub mod services;
