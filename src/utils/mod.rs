//! Pure helpers shared by services and handlers.
//!
//! - [`key_deriver`] - Auto key derivation and custom key validation
//! - [`url_normalizer`] - URL trimming and scheme validation

pub mod key_deriver;
pub mod url_normalizer;
