//! Orgreg Server: HTTP boundary for the organization registry.

pub mod api;
pub mod config;

pub use api::router;
pub use config::{ConfigError, ServerConfig};
