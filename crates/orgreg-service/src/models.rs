//! Inputs and outputs of the lifecycle operations.

use serde::Serialize;
use uuid::Uuid;

/// Input for creating an organization together with its admin.
#[derive(Debug, Clone)]
pub struct CreateOrgInput {
    pub organization_name: String,
    pub email: String,
    pub password: String,
}

/// Input for renaming an organization and replacing its admin
/// credentials. Every field is applied, even if unchanged.
#[derive(Debug, Clone)]
pub struct UpdateOrgInput {
    pub organization_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutput {
    /// Signed JWT access token.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
    pub org_id: Uuid,
}

/// Public view of an organization.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OrganizationView {
    pub organization_name: String,
    pub collection_name: String,
    pub admin_email: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutput {
    pub message: String,
}

/// A broken aggregate invariant found by
/// [`crate::OrganizationService::verify`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// `collection_name` is not `org_` + `organization_name`.
    CollectionNameMismatch { expected: String, actual: String },
    /// No admin record references the organization.
    AdminMissing,
    /// The admin's denormalized `org_name` drifted.
    AdminOrgNameMismatch { expected: String, actual: String },
    /// The physical tenant collection does not exist.
    CollectionMissing { collection_name: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyReport {
    pub organization_name: String,
    pub consistent: bool,
    pub violations: Vec<Violation>,
}
