//! HTTP layer for request/response handling.
//!
//! This layer translates HTTP requests into registry operations and formats
//! responses according to the public contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing
//! - [`routes`] - JSON API route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
