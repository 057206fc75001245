//! Organization domain model.
//!
//! Organizations are the tenants of the registry. Each one owns exactly
//! one admin account and one dedicated data collection whose name is
//! derived from the organization name.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RegistryError, RegistryResult};

/// Prefix shared by every tenant data collection.
pub const COLLECTION_PREFIX: &str = "org_";

/// Longest organization name accepted.
pub const MAX_ORGANIZATION_NAME_LEN: usize = 64;

/// Organization metadata record.
///
/// `id` is assigned at creation and survives renames; `collection_name`
/// always equals `org_` followed by `organization_name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organization {
    pub id: Uuid,
    pub organization_name: String,
    pub collection_name: String,
    pub admin_email: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a new organization record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    pub organization_name: String,
    pub collection_name: String,
    pub admin_email: String,
}

/// Fields that can be updated on an existing organization.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateOrganization {
    pub organization_name: Option<String>,
    pub collection_name: Option<String>,
    pub admin_email: Option<String>,
}

/// Returns `true` if `name` can be used as an organization name.
///
/// Names become part of a table identifier, so only ASCII letters,
/// digits, `_` and `-` are allowed.
pub fn is_valid_organization_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_ORGANIZATION_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub fn validate_organization_name(name: &str) -> RegistryResult<()> {
    if is_valid_organization_name(name) {
        Ok(())
    } else {
        Err(RegistryError::validation(format!(
            "organization_name must be 1-{MAX_ORGANIZATION_NAME_LEN} characters of \
             letters, digits, '_' or '-'"
        )))
    }
}

/// Validated name of a physical tenant collection.
///
/// Holding a `CollectionName` proves the value is safe to use as a
/// storage identifier. Only the repository turns it into a handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionName(String);

impl CollectionName {
    /// Derive the collection name for an organization.
    pub fn for_organization(organization_name: &str) -> RegistryResult<Self> {
        validate_organization_name(organization_name)?;
        Ok(Self(format!("{COLLECTION_PREFIX}{organization_name}")))
    }

    /// Re-validate a collection name read back from storage.
    pub fn parse(stored: &str) -> RegistryResult<Self> {
        let organization_name = stored.strip_prefix(COLLECTION_PREFIX).ok_or_else(|| {
            RegistryError::Internal(format!("collection name `{stored}` lacks the tenant prefix"))
        })?;
        Self::for_organization(organization_name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CollectionName> for String {
    fn from(name: CollectionName) -> Self {
        name.0
    }
}
