//! Core domain entities.
//!
//! - [`UrlRecord`] - A registered URL and its keys
//! - [`KeyState`] - Pending / keyed lifecycle of a record
//! - [`Shortened`] - Outcome of registering a URL
//! - [`RegistryStats`] - Record counts

pub mod url_record;

pub use url_record::{KeyState, RegistryStats, Shortened, UrlRecord};
