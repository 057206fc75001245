//! Error types for the organization registry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Organization name already exists")]
    DuplicateOrganization { name: String },

    #[error("Admin email already registered")]
    DuplicateAdmin { email: String },

    #[error("{entity} not found")]
    NotFound { entity: String, id: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{reason}")]
    Forbidden { reason: String },

    #[error("Missing Token")]
    MissingToken,

    #[error("Invalid Token")]
    InvalidToken,

    #[error("Failed to rename collection {from} to {to}: {reason}")]
    RenameFailed {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    /// Shorthand for a missing organization.
    pub fn organization_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Organization".into(),
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Outcome of an operation on a physical tenant collection.
///
/// Kept separate from [`RegistryError`] so that callers decide per call
/// site whether a failure is fatal (rename) or ignorable (drop).
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("collection `{0}` already exists")]
    AlreadyExists(String),

    #[error("collection `{0}` does not exist")]
    Missing(String),

    #[error("store rejected collection operation: {0}")]
    Store(String),
}

impl From<CollectionError> for RegistryError {
    fn from(err: CollectionError) -> Self {
        match err {
            CollectionError::Store(msg) => RegistryError::StoreUnavailable(msg),
            other => RegistryError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_do_not_leak_identifiers() {
        let err = RegistryError::DuplicateAdmin {
            email: "a@x.com".into(),
        };
        assert_eq!(err.to_string(), "Admin email already registered");

        let err = RegistryError::organization_not_found("Acme");
        assert_eq!(err.to_string(), "Organization not found");
    }

    #[test]
    fn collection_store_error_maps_to_unavailable() {
        let err: RegistryError = CollectionError::Store("connection reset".into()).into();
        assert!(matches!(err, RegistryError::StoreUnavailable(_)));
    }
}
