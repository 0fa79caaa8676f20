//! Business logic services for the application layer.

pub mod key_assigner;
pub mod registry;
pub mod resolver;
pub mod shorten_service;

pub use key_assigner::{KeyAssigner, KeyPolicy};
pub use registry::Registry;
pub use resolver::Resolver;
pub use shorten_service::{ShortenService, derive_key_for};
