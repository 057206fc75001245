//! Admin domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single administrator of an organization.
///
/// `org_name` is a denormalized copy of the owning organization's name
/// and is rewritten together with it on every rename.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub org_id: Uuid,
    pub org_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdmin {
    pub email: String,
    /// Argon2id PHC string; hashing happens before the record is built.
    pub password_hash: String,
    pub org_id: Uuid,
    pub org_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAdmin {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub org_name: Option<String>,
}
