//! Queries against the `admins` metadata table.

use chrono::{DateTime, Utc};
use orgreg_core::models::admin::{Admin, CreateAdmin, UpdateAdmin};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct AdminRow {
    email: String,
    password_hash: String,
    org_id: String,
    org_name: String,
    created_at: DateTime<Utc>,
}

impl AdminRow {
    fn into_admin(self, id: Uuid) -> Result<Admin, DbError> {
        let org_id = Uuid::parse_str(&self.org_id)
            .map_err(|e| DbError::InvalidRecord(format!("invalid org UUID: {e}")))?;
        Ok(Admin {
            id,
            email: self.email,
            password_hash: self.password_hash,
            org_id,
            org_name: self.org_name,
            created_at: self.created_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AdminRowWithId {
    record_id: String,
    email: String,
    password_hash: String,
    org_id: String,
    org_name: String,
    created_at: DateTime<Utc>,
}

impl AdminRowWithId {
    fn try_into_admin(self) -> Result<Admin, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::InvalidRecord(format!("invalid admin UUID: {e}")))?;
        AdminRow {
            email: self.email,
            password_hash: self.password_hash,
            org_id: self.org_id,
            org_name: self.org_name,
            created_at: self.created_at,
        }
        .into_admin(id)
    }
}

pub(super) async fn insert<C: Connection>(
    db: &Surreal<C>,
    input: CreateAdmin,
) -> Result<Admin, DbError> {
    let id = Uuid::new_v4();
    let id_str = id.to_string();

    let result = db
        .query(
            "CREATE type::record('admins', $id) SET \
             email = $email, password_hash = $password_hash, \
             org_id = $org_id, org_name = $org_name",
        )
        .bind(("id", id_str.clone()))
        .bind(("email", input.email))
        .bind(("password_hash", input.password_hash))
        .bind(("org_id", input.org_id.to_string()))
        .bind(("org_name", input.org_name))
        .await?;

    let mut result = result.check().map_err(DbError::from_statement)?;

    let rows: Vec<AdminRow> = result.take(0)?;
    let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
        entity: "Admin".into(),
        id: id_str,
    })?;

    row.into_admin(id)
}

async fn find_one<C: Connection>(
    db: &Surreal<C>,
    field: &'static str,
    value: String,
) -> Result<Option<Admin>, DbError> {
    let query = format!("SELECT meta::id(id) AS record_id, * FROM admins WHERE {field} = $value");
    let mut result = db.query(query).bind(("value", value)).await?;

    let rows: Vec<AdminRowWithId> = result.take(0)?;
    rows.into_iter()
        .next()
        .map(AdminRowWithId::try_into_admin)
        .transpose()
}

pub(super) async fn find_by_email<C: Connection>(
    db: &Surreal<C>,
    email: &str,
) -> Result<Option<Admin>, DbError> {
    find_one(db, "email", email.to_string()).await
}

pub(super) async fn find_by_org<C: Connection>(
    db: &Surreal<C>,
    org_id: Uuid,
) -> Result<Option<Admin>, DbError> {
    find_one(db, "org_id", org_id.to_string()).await
}

pub(super) async fn update_by_org<C: Connection>(
    db: &Surreal<C>,
    org_id: Uuid,
    input: UpdateAdmin,
) -> Result<(), DbError> {
    let org_id_str = org_id.to_string();

    let mut sets = Vec::new();
    if input.email.is_some() {
        sets.push("email = $email");
    }
    if input.password_hash.is_some() {
        sets.push("password_hash = $password_hash");
    }
    if input.org_name.is_some() {
        sets.push("org_name = $org_name");
    }

    if sets.is_empty() {
        return Ok(());
    }

    let query = format!(
        "UPDATE admins SET {} WHERE org_id = $org_id",
        sets.join(", ")
    );

    let mut builder = db.query(&query).bind(("org_id", org_id_str.clone()));

    if let Some(email) = input.email {
        builder = builder.bind(("email", email));
    }
    if let Some(password_hash) = input.password_hash {
        builder = builder.bind(("password_hash", password_hash));
    }
    if let Some(org_name) = input.org_name {
        builder = builder.bind(("org_name", org_name));
    }

    let result = builder.await?;
    let mut result = result.check().map_err(DbError::from_statement)?;

    let rows: Vec<AdminRow> = result.take(0)?;
    if rows.is_empty() {
        return Err(DbError::NotFound {
            entity: "Admin".into(),
            id: format!("org_id={org_id_str}"),
        });
    }

    Ok(())
}

pub(super) async fn delete_by_org<C: Connection>(
    db: &Surreal<C>,
    org_id: Uuid,
) -> Result<(), DbError> {
    db.query("DELETE admins WHERE org_id = $org_id")
        .bind(("org_id", org_id.to_string()))
        .await?
        .check()
        .map_err(DbError::from_statement)?;

    Ok(())
}
