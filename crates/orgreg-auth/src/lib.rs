//! Orgreg Auth: Argon2id password hashing and JWT access token
//! issuance/validation for organization admins.

pub mod config;
pub mod error;
pub mod password;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use token::{AccessTokenClaims, ValidatedClaims};
