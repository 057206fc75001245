//! Physical tenant collections.
//!
//! Each tenant collection is a SCHEMALESS table in the registry
//! database. Table names cannot be bound as query parameters, so they
//! are spliced in as backtick-quoted identifiers; [`CollectionName`]
//! guarantees they contain only letters, digits, `_` and `-`.

use std::fmt::Display;

use orgreg_core::error::CollectionError;
use orgreg_core::models::organization::CollectionName;
use orgreg_core::repository::DropOutcome;
use surrealdb::{Connection, Surreal};
use tracing::debug;

fn ident(name: &CollectionName) -> String {
    format!("`{}`", name.as_str())
}

fn store_err(err: impl Display) -> CollectionError {
    CollectionError::Store(err.to_string())
}

pub(super) async fn exists<C: Connection>(
    db: &Surreal<C>,
    name: &CollectionName,
) -> Result<bool, CollectionError> {
    let mut result = db.query("INFO FOR DB").await.map_err(store_err)?;
    let info: Option<serde_json::Value> = result.take(0).map_err(store_err)?;

    Ok(info
        .as_ref()
        .and_then(|info| info.get("tables"))
        .and_then(|tables| tables.get(name.as_str()))
        .is_some())
}

pub(super) async fn create<C: Connection>(
    db: &Surreal<C>,
    name: &CollectionName,
    seed: serde_json::Value,
) -> Result<(), CollectionError> {
    let table = ident(name);
    let query = format!(
        "DEFINE TABLE IF NOT EXISTS {table} SCHEMALESS; \
         CREATE {table} CONTENT $seed;"
    );

    db.query(query)
        .bind(("seed", seed))
        .await
        .map_err(store_err)?
        .check()
        .map_err(store_err)?;

    debug!(collection = %name, "Tenant collection created");
    Ok(())
}

pub(super) async fn rename<C: Connection>(
    db: &Surreal<C>,
    from: &CollectionName,
    to: &CollectionName,
) -> Result<(), CollectionError> {
    if !exists(db, from).await? {
        return Err(CollectionError::Missing(from.to_string()));
    }
    if exists(db, to).await? {
        return Err(CollectionError::AlreadyExists(to.to_string()));
    }

    // Copy and removal commit together; DEFINE without IF NOT EXISTS
    // aborts the transaction if `to` appeared since the check above.
    let (source, target) = (ident(from), ident(to));
    let query = format!(
        "BEGIN TRANSACTION; \
         DEFINE TABLE {target} SCHEMALESS; \
         INSERT INTO {target} (SELECT * OMIT id FROM {source}); \
         REMOVE TABLE {source}; \
         COMMIT TRANSACTION;"
    );

    db.query(query)
        .await
        .map_err(store_err)?
        .check()
        .map_err(|e| {
            let message = e.to_string();
            if message.contains("already exists") {
                CollectionError::AlreadyExists(to.to_string())
            } else {
                CollectionError::Store(message)
            }
        })?;

    debug!(from = %from, to = %to, "Tenant collection renamed");
    Ok(())
}

pub(super) async fn remove<C: Connection>(
    db: &Surreal<C>,
    name: &CollectionName,
) -> Result<DropOutcome, CollectionError> {
    if !exists(db, name).await? {
        return Ok(DropOutcome::NotPresent);
    }

    let query = format!("REMOVE TABLE IF EXISTS {};", ident(name));
    db.query(query)
        .await
        .map_err(store_err)?
        .check()
        .map_err(store_err)?;

    debug!(collection = %name, "Tenant collection dropped");
    Ok(DropOutcome::Dropped)
}
