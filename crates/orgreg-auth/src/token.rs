//! JWT access token issuance and verification.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every admin access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessTokenClaims {
    /// Subject: admin ID (UUID string).
    pub sub: String,
    /// Admin email at issuance time.
    pub email: String,
    /// Organization ID (UUID string).
    pub org_id: String,
    /// Organization name at issuance time. Not refreshed on rename.
    pub org_name: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

fn is_hmac(alg: Algorithm) -> bool {
    matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}

fn encoding_key(config: &AuthConfig) -> Result<EncodingKey, AuthError> {
    match config.jwt_algorithm {
        alg if is_hmac(alg) => Ok(EncodingKey::from_secret(config.jwt_secret.as_bytes())),
        Algorithm::EdDSA => {
            let pem = config
                .jwt_private_key_pem
                .as_deref()
                .ok_or_else(|| AuthError::Crypto("missing EdDSA private key".into()))?;
            EncodingKey::from_ed_pem(pem.as_bytes())
                .map_err(|e| AuthError::Crypto(format!("bad private key: {e}")))
        }
        other => Err(AuthError::Crypto(format!(
            "unsupported signing algorithm: {other:?}"
        ))),
    }
}

fn decoding_key(config: &AuthConfig) -> Result<DecodingKey, AuthError> {
    match config.jwt_algorithm {
        alg if is_hmac(alg) => Ok(DecodingKey::from_secret(config.jwt_secret.as_bytes())),
        Algorithm::EdDSA => {
            let pem = config
                .jwt_public_key_pem
                .as_deref()
                .ok_or_else(|| AuthError::Crypto("missing EdDSA public key".into()))?;
            DecodingKey::from_ed_pem(pem.as_bytes())
                .map_err(|e| AuthError::Crypto(format!("bad public key: {e}")))
        }
        other => Err(AuthError::Crypto(format!(
            "unsupported signing algorithm: {other:?}"
        ))),
    }
}

/// Issue a signed JWT access token for an organization admin.
pub fn issue_access_token(
    admin_id: Uuid,
    email: &str,
    org_id: Uuid,
    org_name: &str,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let exp = i64::try_from(config.access_token_lifetime_secs)
        .ok()
        .and_then(|lifetime| now.checked_add(lifetime))
        .ok_or_else(|| AuthError::Crypto("access token lifetime out of range".into()))?;
    let claims = AccessTokenClaims {
        sub: admin_id.to_string(),
        email: email.to_string(),
        org_id: org_id.to_string(),
        org_name: org_name.to_string(),
        iat: now,
        exp,
    };

    encode_claims(&claims, config)
}

/// Sign an arbitrary claims set with the configured key.
pub fn encode_claims(claims: &AccessTokenClaims, config: &AuthConfig) -> Result<String, AuthError> {
    let key = encoding_key(config)?;
    let header = Header::new(config.jwt_algorithm);
    jsonwebtoken::encode(&header, claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify a JWT access token.
pub fn decode_access_token(
    token: &str,
    config: &AuthConfig,
) -> Result<AccessTokenClaims, AuthError> {
    let key = decoding_key(config)?;

    let mut validation = Validation::new(config.jwt_algorithm);
    validation.set_required_spec_claims(&["sub", "exp"]);

    jsonwebtoken::decode::<AccessTokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

/// Validated JWT claims: a newtype proving the token was verified.
///
/// Operations that require an authenticated admin take this by
/// reference instead of reading identity from ambient request state.
#[derive(Debug, Clone)]
pub struct ValidatedClaims(pub AccessTokenClaims);

impl ValidatedClaims {
    pub fn org_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.0.org_id)
            .map_err(|e| AuthError::TokenInvalid(format!("org_id is not a UUID: {e}")))
    }

    pub fn org_name(&self) -> &str {
        &self.0.org_name
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

/// Validate a JWT access token (signature, expiry) and return the
/// verified claims.
///
/// Purely local; no database lookup is performed.
pub fn validate_access_token(
    token: &str,
    config: &AuthConfig,
) -> Result<ValidatedClaims, AuthError> {
    decode_access_token(token, config).map(ValidatedClaims)
}
