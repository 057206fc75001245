//! Mapping of registry errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use orgreg_core::error::RegistryError;
use serde::Serialize;

/// Error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub detail: String,
}

/// Newtype so the HTTP mapping lives at the boundary, not in core.
#[derive(Debug)]
pub struct ApiError(pub RegistryError);

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self.0 {
            RegistryError::DuplicateOrganization { .. } => (
                StatusCode::BAD_REQUEST,
                "duplicate_organization",
                self.0.to_string(),
            ),
            RegistryError::DuplicateAdmin { .. } => (
                StatusCode::BAD_REQUEST,
                "duplicate_admin",
                self.0.to_string(),
            ),
            RegistryError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, "not_found", self.0.to_string())
            }
            RegistryError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.0.to_string(),
            ),
            RegistryError::MissingToken => {
                (StatusCode::UNAUTHORIZED, "missing_token", self.0.to_string())
            }
            RegistryError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "invalid_token", self.0.to_string())
            }
            RegistryError::Forbidden { reason } => {
                (StatusCode::FORBIDDEN, "forbidden", reason.clone())
            }
            RegistryError::RenameFailed { from, to, reason } => {
                tracing::warn!(from = %from, to = %to, reason = %reason, "Rename failed");
                (
                    StatusCode::CONFLICT,
                    "rename_failed",
                    format!("Failed to rename collection {from} to {to}"),
                )
            }
            RegistryError::Validation { message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                message.clone(),
            ),
            RegistryError::StoreUnavailable(msg) => {
                tracing::error!(error = %msg, "Store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "store_unavailable",
                    "Storage temporarily unavailable".to_string(),
                )
            }
            RegistryError::Crypto(msg) | RegistryError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: code,
                detail,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: RegistryError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            status_of(RegistryError::DuplicateOrganization { name: "a".into() }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(RegistryError::organization_not_found("a")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(RegistryError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(RegistryError::Forbidden { reason: "no".into() }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(RegistryError::RenameFailed {
                from: "org_a".into(),
                to: "org_b".into(),
                reason: "exists".into(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(RegistryError::validation("bad")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(RegistryError::StoreUnavailable("down".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(RegistryError::Crypto("argon2".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
