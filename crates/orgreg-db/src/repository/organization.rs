//! Queries against the `organizations` metadata table.

use chrono::{DateTime, Utc};
use orgreg_core::models::organization::{CreateOrganization, Organization, UpdateOrganization};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct OrganizationRow {
    organization_name: String,
    collection_name: String,
    admin_email: String,
    created_at: DateTime<Utc>,
}

impl OrganizationRow {
    fn into_organization(self, id: Uuid) -> Organization {
        Organization {
            id,
            organization_name: self.organization_name,
            collection_name: self.collection_name,
            admin_email: self.admin_email,
            created_at: self.created_at,
        }
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct OrganizationRowWithId {
    record_id: String,
    organization_name: String,
    collection_name: String,
    admin_email: String,
    created_at: DateTime<Utc>,
}

impl OrganizationRowWithId {
    fn try_into_organization(self) -> Result<Organization, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::InvalidRecord(format!("invalid organization UUID: {e}")))?;
        Ok(Organization {
            id,
            organization_name: self.organization_name,
            collection_name: self.collection_name,
            admin_email: self.admin_email,
            created_at: self.created_at,
        })
    }
}

pub(super) async fn insert<C: Connection>(
    db: &Surreal<C>,
    input: CreateOrganization,
) -> Result<Organization, DbError> {
    let id = Uuid::new_v4();
    let id_str = id.to_string();

    let result = db
        .query(
            "CREATE type::record('organizations', $id) SET \
             organization_name = $organization_name, \
             collection_name = $collection_name, \
             admin_email = $admin_email",
        )
        .bind(("id", id_str.clone()))
        .bind(("organization_name", input.organization_name))
        .bind(("collection_name", input.collection_name))
        .bind(("admin_email", input.admin_email))
        .await?;

    let mut result = result.check().map_err(DbError::from_statement)?;

    let rows: Vec<OrganizationRow> = result.take(0)?;
    let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
        entity: "Organization".into(),
        id: id_str,
    })?;

    Ok(row.into_organization(id))
}

pub(super) async fn find_by_id<C: Connection>(
    db: &Surreal<C>,
    id: Uuid,
) -> Result<Option<Organization>, DbError> {
    let mut result = db
        .query("SELECT * FROM type::record('organizations', $id)")
        .bind(("id", id.to_string()))
        .await?;

    let rows: Vec<OrganizationRow> = result.take(0)?;
    Ok(rows.into_iter().next().map(|row| row.into_organization(id)))
}

pub(super) async fn find_by_name<C: Connection>(
    db: &Surreal<C>,
    name: &str,
) -> Result<Option<Organization>, DbError> {
    let mut result = db
        .query(
            "SELECT meta::id(id) AS record_id, * \
             FROM organizations WHERE organization_name = $name",
        )
        .bind(("name", name.to_string()))
        .await?;

    let rows: Vec<OrganizationRowWithId> = result.take(0)?;
    rows.into_iter()
        .next()
        .map(OrganizationRowWithId::try_into_organization)
        .transpose()
}

pub(super) async fn update<C: Connection>(
    db: &Surreal<C>,
    id: Uuid,
    input: UpdateOrganization,
) -> Result<Organization, DbError> {
    let id_str = id.to_string();

    let mut sets = Vec::new();
    if input.organization_name.is_some() {
        sets.push("organization_name = $organization_name");
    }
    if input.collection_name.is_some() {
        sets.push("collection_name = $collection_name");
    }
    if input.admin_email.is_some() {
        sets.push("admin_email = $admin_email");
    }

    if sets.is_empty() {
        return find_by_id(db, id).await?.ok_or(DbError::NotFound {
            entity: "Organization".into(),
            id: id_str,
        });
    }

    let query = format!(
        "UPDATE type::record('organizations', $id) SET {}",
        sets.join(", ")
    );

    let mut builder = db.query(&query).bind(("id", id_str.clone()));

    if let Some(organization_name) = input.organization_name {
        builder = builder.bind(("organization_name", organization_name));
    }
    if let Some(collection_name) = input.collection_name {
        builder = builder.bind(("collection_name", collection_name));
    }
    if let Some(admin_email) = input.admin_email {
        builder = builder.bind(("admin_email", admin_email));
    }

    let result = builder.await?;
    let mut result = result.check().map_err(DbError::from_statement)?;

    let rows: Vec<OrganizationRow> = result.take(0)?;
    let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
        entity: "Organization".into(),
        id: id_str,
    })?;

    Ok(row.into_organization(id))
}

pub(super) async fn delete_by_name<C: Connection>(
    db: &Surreal<C>,
    name: &str,
) -> Result<(), DbError> {
    db.query("DELETE organizations WHERE organization_name = $name")
        .bind(("name", name.to_string()))
        .await?
        .check()
        .map_err(DbError::from_statement)?;

    Ok(())
}
