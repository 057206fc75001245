//! Axum extractors.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use orgreg_auth::config::AuthConfig;
use orgreg_auth::token::{ValidatedClaims, validate_access_token};
use orgreg_core::error::RegistryError;

use super::error::ApiError;

/// An admin authenticated by a `Bearer` access token.
///
/// The claims are handed to the service by parameter; nothing else
/// reads identity from the request.
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin(pub ValidatedClaims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedAdmin
where
    S: Send + Sync,
    Arc<AuthConfig>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<AuthConfig>::from_ref(state);
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(RegistryError::MissingToken)?;
        let token = bearer_token(header.to_str().map_err(|_| RegistryError::InvalidToken)?)?;

        let claims = validate_access_token(token, &config).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            RegistryError::InvalidToken
        })?;

        Ok(Self(claims))
    }
}

fn bearer_token(value: &str) -> Result<&str, RegistryError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RegistryError::MissingToken);
    }
    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
            let token = token.trim();
            if token.is_empty() {
                Err(RegistryError::MissingToken)
            } else {
                Ok(token)
            }
        }
        _ if value.eq_ignore_ascii_case("bearer") => Err(RegistryError::MissingToken),
        _ => Err(RegistryError::InvalidToken),
    }
}
