//! Orgreg Database: SurrealDB connection management, schema
//! migrations and the tenant repository implementation.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - The [`orgreg_core::repository::TenantRepository`] implementation
//!   ([`repository::SurrealTenantRepository`])
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use repository::SurrealTenantRepository;
pub use schema::run_migrations;
