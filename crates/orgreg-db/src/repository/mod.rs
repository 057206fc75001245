//! SurrealDB repository implementations.

mod admin;
mod collection;
mod organization;
mod tenant;

pub use tenant::SurrealTenantRepository;
