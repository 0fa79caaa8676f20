//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for (de)serialization; JSON request bodies are also
//! checked with validator before reaching the service layer.

pub mod add_url;
pub mod health;
pub mod short;
