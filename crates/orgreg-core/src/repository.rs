//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Each method is a single logical
//! unit against the store; none of them spans several records of the
//! aggregate, so multi-step consistency is the caller's concern.

use uuid::Uuid;

use crate::error::{CollectionError, RegistryResult};
use crate::models::{
    admin::{Admin, CreateAdmin, UpdateAdmin},
    organization::{CollectionName, CreateOrganization, Organization, UpdateOrganization},
};

/// Result of dropping a tenant collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Dropped,
    /// The collection was already absent. Not an error.
    NotPresent,
}

/// Storage for the organization aggregate: the `organizations` and
/// `admins` metadata collections plus one data collection per tenant.
pub trait TenantRepository: Send + Sync {
    // -- organizations ----------------------------------------------------

    fn find_org_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = RegistryResult<Option<Organization>>> + Send;
    fn find_org_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = RegistryResult<Option<Organization>>> + Send;
    fn insert_org(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = RegistryResult<Organization>> + Send;
    fn update_org(
        &self,
        id: Uuid,
        input: UpdateOrganization,
    ) -> impl Future<Output = RegistryResult<Organization>> + Send;
    fn delete_org(&self, name: &str) -> impl Future<Output = RegistryResult<()>> + Send;

    // -- admins -----------------------------------------------------------

    fn find_admin_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = RegistryResult<Option<Admin>>> + Send;
    fn find_admin_by_org(
        &self,
        org_id: Uuid,
    ) -> impl Future<Output = RegistryResult<Option<Admin>>> + Send;
    fn insert_admin(&self, input: CreateAdmin)
    -> impl Future<Output = RegistryResult<Admin>> + Send;
    fn update_admin(
        &self,
        org_id: Uuid,
        input: UpdateAdmin,
    ) -> impl Future<Output = RegistryResult<()>> + Send;
    fn delete_admin_by_org(&self, org_id: Uuid) -> impl Future<Output = RegistryResult<()>> + Send;

    // -- tenant collections -----------------------------------------------

    /// Create the collection if needed and store `seed` in it.
    fn create_tenant_collection(
        &self,
        name: &CollectionName,
        seed: serde_json::Value,
    ) -> impl Future<Output = Result<(), CollectionError>> + Send;
    /// Move every document of `from` into a new collection `to` and
    /// remove `from`. Fails with [`CollectionError::AlreadyExists`] if `to`
    /// exists and [`CollectionError::Missing`] if `from` does not.
    fn rename_collection(
        &self,
        from: &CollectionName,
        to: &CollectionName,
    ) -> impl Future<Output = Result<(), CollectionError>> + Send;
    fn drop_collection(
        &self,
        name: &CollectionName,
    ) -> impl Future<Output = Result<DropOutcome, CollectionError>> + Send;
    fn collection_exists(
        &self,
        name: &CollectionName,
    ) -> impl Future<Output = Result<bool, CollectionError>> + Send;
}
