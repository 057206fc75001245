//! Request and response bodies.

use std::borrow::Cow;

use orgreg_core::models::organization::is_valid_organization_name;
use orgreg_service::{CreateOrgInput, LoginInput, UpdateOrgInput};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

fn validate_organization_name(name: &str) -> Result<(), ValidationError> {
    if is_valid_organization_name(name) {
        Ok(())
    } else {
        Err(ValidationError::new("organization_name").with_message(Cow::Borrowed(
            "must be 1-64 characters of letters, digits, '_' or '-'",
        )))
    }
}

/// Body of `POST /org/create` and `PUT /org/update`.
#[derive(Debug, Deserialize, Validate)]
pub struct OrganizationRequest {
    #[validate(custom(function = "validate_organization_name"))]
    pub organization_name: String,

    #[validate(
        email(message = "must be a valid email address"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 1, max = 1024, message = "must be 1-1024 characters"))]
    pub password: String,
}

impl From<OrganizationRequest> for CreateOrgInput {
    fn from(req: OrganizationRequest) -> Self {
        Self {
            organization_name: req.organization_name,
            email: req.email,
            password: req.password,
        }
    }
}

impl From<OrganizationRequest> for UpdateOrgInput {
    fn from(req: OrganizationRequest) -> Self {
        Self {
            organization_name: req.organization_name,
            email: req.email,
            password: req.password,
        }
    }
}

/// Body of `POST /admin/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 1024, message = "must be 1-1024 characters"))]
    pub password: String,
}

impl From<LoginRequest> for LoginInput {
    fn from(req: LoginRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
        }
    }
}

/// Query string of `GET /org/get` and `DELETE /org/delete`.
#[derive(Debug, Deserialize, Validate)]
pub struct OrganizationQuery {
    #[validate(custom(function = "validate_organization_name"))]
    pub organization_name: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
