//! Authentication error types.

use orgreg_core::error::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for RegistryError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => RegistryError::InvalidCredentials,
            // Expired and malformed tokens are indistinguishable to callers.
            AuthError::TokenExpired | AuthError::TokenInvalid(_) => RegistryError::InvalidToken,
            AuthError::Crypto(msg) => RegistryError::Crypto(msg),
        }
    }
}
