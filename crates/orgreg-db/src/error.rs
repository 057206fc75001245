//! Database-specific error types and conversions.

use std::fmt::Display;

use orgreg_core::error::RegistryError;

use crate::schema::UNIQUE_INDEXES;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Connection failed during {stage}: {reason}")]
    Connection { stage: &'static str, reason: String },

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Unique index {index} violated")]
    UniqueViolation { index: &'static str },

    /// Another transaction wrote the same keys first; the store rolled
    /// this one back.
    #[error("Write conflict: {0}")]
    WriteConflict(String),

    #[error("Malformed record: {0}")]
    InvalidRecord(String),
}

fn mentions_write_conflict(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("conflict") && message.contains("transaction")
}

impl DbError {
    /// Classify a failed statement, recognising unique-index violations
    /// on the registry's own indexes.
    pub(crate) fn from_statement(err: impl Display) -> Self {
        let message = err.to_string();
        if message.contains("already contains") {
            if let Some(index) = UNIQUE_INDEXES.iter().copied().find(|idx| message.contains(idx)) {
                return DbError::UniqueViolation { index };
            }
        }
        if mentions_write_conflict(&message) {
            return DbError::WriteConflict(message);
        }
        DbError::Query(message)
    }

    /// True when the write lost a race against a concurrent transaction,
    /// whether the store reported it per statement or for the whole query.
    pub(crate) fn is_write_conflict(&self) -> bool {
        match self {
            DbError::WriteConflict(_) => true,
            DbError::Surreal(e) => mentions_write_conflict(&e.to_string()),
            _ => false,
        }
    }
}

impl From<DbError> for RegistryError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => RegistryError::NotFound { entity, id },
            DbError::Surreal(e) => RegistryError::StoreUnavailable(e.to_string()),
            DbError::Connection { stage, reason } => {
                RegistryError::StoreUnavailable(format!("{stage}: {reason}"))
            }
            DbError::Query(msg) | DbError::WriteConflict(msg) => {
                RegistryError::StoreUnavailable(msg)
            }
            other => RegistryError::Internal(other.to_string()),
        }
    }
}
