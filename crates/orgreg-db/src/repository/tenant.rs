//! SurrealDB implementation of [`TenantRepository`].

use orgreg_core::error::{CollectionError, RegistryError, RegistryResult};
use orgreg_core::models::admin::{Admin, CreateAdmin, UpdateAdmin};
use orgreg_core::models::organization::{
    CollectionName, CreateOrganization, Organization, UpdateOrganization,
};
use orgreg_core::repository::{DropOutcome, TenantRepository};
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use super::{admin, collection, organization};
use crate::error::DbError;
use crate::schema::{IDX_ADMIN_EMAIL, IDX_ADMIN_ORG};

/// SurrealDB implementation of the tenant repository.
///
/// The only component that turns a tenant name into a physical table.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

/// A write conflict on these tables means a concurrent request wrote the
/// same unique key; report it like the index violation it stands for.
fn organization_conflict(err: DbError, name: &str) -> RegistryError {
    match err {
        DbError::UniqueViolation { .. } => RegistryError::DuplicateOrganization {
            name: name.to_string(),
        },
        conflict if conflict.is_write_conflict() => RegistryError::DuplicateOrganization {
            name: name.to_string(),
        },
        other => other.into(),
    }
}

fn admin_conflict(err: DbError, email: &str) -> RegistryError {
    match err {
        DbError::UniqueViolation { index } if index == IDX_ADMIN_EMAIL => {
            RegistryError::DuplicateAdmin {
                email: email.to_string(),
            }
        }
        DbError::UniqueViolation { index } if index == IDX_ADMIN_ORG => {
            RegistryError::Internal("organization already has an admin".into())
        }
        conflict if conflict.is_write_conflict() => RegistryError::DuplicateAdmin {
            email: email.to_string(),
        },
        other => other.into(),
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn find_org_by_name(&self, name: &str) -> RegistryResult<Option<Organization>> {
        Ok(organization::find_by_name(&self.db, name).await?)
    }

    async fn find_org_by_id(&self, id: Uuid) -> RegistryResult<Option<Organization>> {
        Ok(organization::find_by_id(&self.db, id).await?)
    }

    async fn insert_org(&self, input: CreateOrganization) -> RegistryResult<Organization> {
        let name = input.organization_name.clone();
        organization::insert(&self.db, input)
            .await
            .map_err(|e| organization_conflict(e, &name))
    }

    async fn update_org(
        &self,
        id: Uuid,
        input: UpdateOrganization,
    ) -> RegistryResult<Organization> {
        let name = input.organization_name.clone().unwrap_or_default();
        organization::update(&self.db, id, input)
            .await
            .map_err(|e| organization_conflict(e, &name))
    }

    async fn delete_org(&self, name: &str) -> RegistryResult<()> {
        Ok(organization::delete_by_name(&self.db, name).await?)
    }

    async fn find_admin_by_email(&self, email: &str) -> RegistryResult<Option<Admin>> {
        Ok(admin::find_by_email(&self.db, email).await?)
    }

    async fn find_admin_by_org(&self, org_id: Uuid) -> RegistryResult<Option<Admin>> {
        Ok(admin::find_by_org(&self.db, org_id).await?)
    }

    async fn insert_admin(&self, input: CreateAdmin) -> RegistryResult<Admin> {
        let email = input.email.clone();
        admin::insert(&self.db, input)
            .await
            .map_err(|e| admin_conflict(e, &email))
    }

    async fn update_admin(&self, org_id: Uuid, input: UpdateAdmin) -> RegistryResult<()> {
        let email = input.email.clone().unwrap_or_default();
        admin::update_by_org(&self.db, org_id, input)
            .await
            .map_err(|e| admin_conflict(e, &email))
    }

    async fn delete_admin_by_org(&self, org_id: Uuid) -> RegistryResult<()> {
        Ok(admin::delete_by_org(&self.db, org_id).await?)
    }

    async fn create_tenant_collection(
        &self,
        name: &CollectionName,
        seed: serde_json::Value,
    ) -> Result<(), CollectionError> {
        collection::create(&self.db, name, seed).await
    }

    async fn rename_collection(
        &self,
        from: &CollectionName,
        to: &CollectionName,
    ) -> Result<(), CollectionError> {
        collection::rename(&self.db, from, to).await
    }

    async fn drop_collection(&self, name: &CollectionName) -> Result<DropOutcome, CollectionError> {
        collection::remove(&self.db, name).await
    }

    async fn collection_exists(&self, name: &CollectionName) -> Result<bool, CollectionError> {
        collection::exists(&self.db, name).await
    }
}
