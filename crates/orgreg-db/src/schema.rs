//! Schema definitions and migration runner for SurrealDB.
//!
//! The two metadata tables are SCHEMAFULL; tenant collections are
//! created on demand as SCHEMALESS tables and are not part of the
//! migrated schema. UUIDs are stored as strings.

use surrealdb::{Connection, Surreal};
use tracing::{debug, info};

use crate::error::DbError;

pub(crate) const IDX_ORGANIZATION_NAME: &str = "idx_organizations_name";
pub(crate) const IDX_ORGANIZATION_COLLECTION: &str = "idx_organizations_collection";
pub(crate) const IDX_ADMIN_EMAIL: &str = "idx_admins_email";
pub(crate) const IDX_ADMIN_ORG: &str = "idx_admins_org";

/// Unique indexes whose violations map to domain errors.
pub(crate) const UNIQUE_INDEXES: &[&str] = &[
    IDX_ORGANIZATION_NAME,
    IDX_ORGANIZATION_COLLECTION,
    IDX_ADMIN_EMAIL,
    IDX_ADMIN_ORG,
];

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "registry_metadata",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1: registry metadata
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations
-- =======================================================================
DEFINE TABLE organizations SCHEMAFULL;
DEFINE FIELD organization_name ON TABLE organizations TYPE string;
DEFINE FIELD collection_name ON TABLE organizations TYPE string;
DEFINE FIELD admin_email ON TABLE organizations TYPE string;
DEFINE FIELD created_at ON TABLE organizations TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_organizations_name ON TABLE organizations \
    COLUMNS organization_name UNIQUE;
DEFINE INDEX idx_organizations_collection ON TABLE organizations \
    COLUMNS collection_name UNIQUE;

-- =======================================================================
-- Admins (exactly one per organization)
-- =======================================================================
DEFINE TABLE admins SCHEMAFULL;
DEFINE FIELD email ON TABLE admins TYPE string;
DEFINE FIELD password_hash ON TABLE admins TYPE string;
DEFINE FIELD org_id ON TABLE admins TYPE string;
DEFINE FIELD org_name ON TABLE admins TYPE string;
DEFINE FIELD created_at ON TABLE admins TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_admins_email ON TABLE admins COLUMNS email UNIQUE;
DEFINE INDEX idx_admins_org ON TABLE admins COLUMNS org_id UNIQUE;
";

/// Apply every pending migration.
///
/// Safe to call on every start-up. Each migration runs in one
/// transaction together with its `_migration` record, so a version is
/// either fully applied and recorded or not at all.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(format!("migration tracking table: {e}")))?;

    let applied = applied_versions(db).await?;
    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|m| !applied.contains(&m.version))
        .collect();

    if pending.is_empty() {
        debug!(applied = applied.len(), "Registry schema is up to date");
        return Ok(());
    }

    for migration in pending {
        apply(db, migration).await?;
    }
    Ok(())
}

async fn applied_versions<C: Connection>(db: &Surreal<C>) -> Result<Vec<u32>, DbError> {
    let mut result = db.query("SELECT VALUE version FROM _migration").await?;
    let versions: Vec<i64> = result.take(0)?;
    versions
        .into_iter()
        .map(|v| {
            u32::try_from(v)
                .map_err(|_| DbError::Migration(format!("recorded version {v} is out of range")))
        })
        .collect()
}

async fn apply<C: Connection>(db: &Surreal<C>, migration: &Migration) -> Result<(), DbError> {
    info!(
        version = migration.version,
        name = migration.name,
        "Applying registry migration"
    );

    let query = format!(
        "BEGIN TRANSACTION;\n{}\nCREATE _migration SET version = $version, name = $name;\nCOMMIT TRANSACTION;",
        migration.sql
    );
    db.query(query)
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| {
            DbError::Migration(format!(
                "v{} '{}' failed: {e}",
                migration.version, migration.name
            ))
        })?;

    info!(version = migration.version, "Registry migration applied");
    Ok(())
}
