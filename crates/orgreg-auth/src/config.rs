//! Authentication configuration.

use jsonwebtoken::Algorithm;

/// Configuration for password hashing and access token signing.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing algorithm. HMAC variants use `jwt_secret`; `EdDSA`
    /// uses the PEM key pair.
    pub jwt_algorithm: Algorithm,
    /// Shared secret for `HS256`/`HS384`/`HS512`.
    pub jwt_secret: String,
    /// PEM-encoded Ed25519 private key (EdDSA only).
    pub jwt_private_key_pem: Option<String>,
    /// PEM-encoded Ed25519 public key (EdDSA only).
    pub jwt_public_key_pem: Option<String>,
    /// Access token lifetime in seconds (default: 3600 = 60 minutes).
    pub access_token_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id hashing.
    pub pepper: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_algorithm: Algorithm::HS256,
            jwt_secret: String::new(),
            jwt_private_key_pem: None,
            jwt_public_key_pem: None,
            access_token_lifetime_secs: 3600,
            pepper: None,
        }
    }
}

impl AuthConfig {
    /// HMAC-signed configuration with the default lifetime.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            ..Default::default()
        }
    }
}
