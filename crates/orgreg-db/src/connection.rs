//! Store handle owned by the process entry point.

use std::fmt;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;
use crate::repository::SurrealTenantRepository;
use crate::schema::run_migrations;

/// Where the registry lives: one namespace/database pair holds the
/// metadata tables and every tenant collection.
#[derive(Clone)]
pub struct DbConfig {
    /// WebSocket endpoint, `host:port`.
    pub url: String,
    pub namespace: String,
    pub database: String,
    /// Root credentials.
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "orgreg".into(),
            database: "master_org_db".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url)
            .field("namespace", &self.namespace)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Live connection to the registry database.
///
/// `main` opens it, hands repositories a clone of the client, and
/// closes it on shutdown. Nothing reaches the store through globals.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Open the socket, sign in as root and select the registry
    /// database. Each step reports which stage failed.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let stage = |stage: &'static str| {
            move |e: surrealdb::Error| DbError::Connection {
                stage,
                reason: e.to_string(),
            }
        };

        let db = Surreal::new::<Ws>(config.url.as_str())
            .await
            .map_err(stage("open"))?;
        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await
        .map_err(stage("signin"))?;
        db.use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await
            .map_err(stage("select"))?;

        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Registry database connected"
        );
        Ok(Self { db })
    }

    /// Connect and bring the schema up to date.
    pub async fn open(config: &DbConfig) -> Result<Self, DbError> {
        let manager = Self::connect(config).await?;
        run_migrations(&manager.db).await?;
        Ok(manager)
    }

    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }

    /// Repository sharing this connection.
    pub fn tenant_repository(&self) -> SurrealTenantRepository<Client> {
        SurrealTenantRepository::new(self.db.clone())
    }

    /// Close the connection. Repositories holding clones keep the
    /// socket alive until they are dropped.
    pub fn disconnect(self) {
        drop(self.db);
        info!("Registry database disconnected");
    }
}
