//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod add_url;
pub mod health;
pub mod redirect;
pub mod short;

pub use add_url::add_url_handler;
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use short::short_handler;
