//! Process configuration loaded from environment variables.

use std::env::VarError;
use std::net::SocketAddr;
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use orgreg_auth::config::AuthConfig;
use orgreg_db::DbConfig;
use thiserror::Error;

/// Upper bound for access token lifetimes: 100 years.
const MAX_TOKEN_LIFETIME_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Everything the binary needs to start.
#[derive(Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub db: DbConfig,
    pub auth: AuthConfig,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("listen_addr", &self.listen_addr)
            .field("db_url", &self.db.url)
            .field("db_namespace", &self.db.namespace)
            .field("db_name", &self.db.database)
            .field("jwt_algorithm", &self.auth.jwt_algorithm)
            .field(
                "access_token_lifetime_secs",
                &self.auth.access_token_lifetime_secs,
            )
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader, so tests never
    /// touch process-global environment state.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let listen_addr = reader("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("LISTEN_ADDR".into(), e.to_string()))?;

        let defaults = DbConfig::default();
        let db = DbConfig {
            url: reader("DB_URL").unwrap_or(defaults.url),
            namespace: reader("DB_NAMESPACE").unwrap_or(defaults.namespace),
            database: reader("DB_NAME").unwrap_or(defaults.database),
            username: reader("DB_USER").unwrap_or(defaults.username),
            password: reader("DB_PASS").unwrap_or(defaults.password),
        };

        let jwt_algorithm = match reader("ALGORITHM") {
            Ok(raw) => Algorithm::from_str(&raw)
                .map_err(|e| ConfigError::InvalidValue("ALGORITHM".into(), e.to_string()))?,
            Err(_) => Algorithm::HS256,
        };

        let jwt_private_key_pem = reader("JWT_PRIVATE_KEY_PEM").ok();
        let jwt_public_key_pem = reader("JWT_PUBLIC_KEY_PEM").ok();

        let jwt_secret = match jwt_algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                let secret = reader("SECRET_KEY")
                    .map_err(|_| ConfigError::MissingVar("SECRET_KEY".into()))?;
                if secret.is_empty() {
                    return Err(ConfigError::InvalidValue(
                        "SECRET_KEY".into(),
                        "must not be empty".into(),
                    ));
                }
                secret
            }
            Algorithm::EdDSA => {
                if jwt_private_key_pem.is_none() {
                    return Err(ConfigError::MissingVar("JWT_PRIVATE_KEY_PEM".into()));
                }
                if jwt_public_key_pem.is_none() {
                    return Err(ConfigError::MissingVar("JWT_PUBLIC_KEY_PEM".into()));
                }
                reader("SECRET_KEY").unwrap_or_default()
            }
            other => {
                return Err(ConfigError::InvalidValue(
                    "ALGORITHM".into(),
                    format!("{other:?} is not supported"),
                ));
            }
        };

        let minutes = reader("ACCESS_TOKEN_EXPIRE_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidValue("ACCESS_TOKEN_EXPIRE_MINUTES".into(), e.to_string())
            })?;
        if minutes == 0 {
            return Err(ConfigError::InvalidValue(
                "ACCESS_TOKEN_EXPIRE_MINUTES".into(),
                "must be greater than zero".into(),
            ));
        }
        // Token expiry is an i64 unix timestamp; cap the lifetime well inside it.
        let access_token_lifetime_secs = minutes
            .checked_mul(60)
            .filter(|secs| *secs <= MAX_TOKEN_LIFETIME_SECS)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "ACCESS_TOKEN_EXPIRE_MINUTES".into(),
                    format!("must be at most {} minutes", MAX_TOKEN_LIFETIME_SECS / 60),
                )
            })?;

        let auth = AuthConfig {
            jwt_algorithm,
            jwt_secret,
            jwt_private_key_pem,
            jwt_public_key_pem,
            access_token_lifetime_secs,
            pepper: reader("PASSWORD_PEPPER").ok().filter(|p| !p.is_empty()),
        };

        Ok(Self {
            listen_addr,
            db,
            auth,
        })
    }
}
