//! Route handlers. Each one validates its input, calls the service and
//! lets [`ApiError`] render failures.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use orgreg_core::error::RegistryError;
use orgreg_core::repository::TenantRepository;
use orgreg_service::{ConsistencyReport, DeleteOutput, LoginOutput, OrganizationView};
use validator::{Validate, ValidationErrors};

use super::AppState;
use super::error::ApiError;
use super::extractors::AuthenticatedAdmin;
use super::models::{HealthResponse, LoginRequest, OrganizationQuery, OrganizationRequest};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Flatten validator output into one message naming each field.
fn validation_error(errors: ValidationErrors) -> ApiError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let reasons: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{field}: {}", reasons.join(", "))
        })
        .collect();
    fields.sort();
    ApiError(RegistryError::validation(fields.join("; ")))
}

fn validated_json<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(body) = payload.map_err(|e| RegistryError::validation(e.body_text()))?;
    body.validate().map_err(validation_error)?;
    Ok(body)
}

fn validated_query<T: Validate>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    let Query(params) = query.map_err(|e| RegistryError::validation(e.body_text()))?;
    params.validate().map_err(validation_error)?;
    Ok(params)
}

pub async fn create<R: TenantRepository + 'static>(
    State(state): State<AppState<R>>,
    payload: Result<Json<OrganizationRequest>, JsonRejection>,
) -> ApiResult<OrganizationView> {
    let body = validated_json(payload)?;
    Ok(Json(state.service.create(body.into()).await?))
}

pub async fn get<R: TenantRepository + 'static>(
    State(state): State<AppState<R>>,
    query: Result<Query<OrganizationQuery>, QueryRejection>,
) -> ApiResult<OrganizationView> {
    let params = validated_query(query)?;
    Ok(Json(state.service.get(&params.organization_name).await?))
}

pub async fn update<R: TenantRepository + 'static>(
    State(state): State<AppState<R>>,
    AuthenticatedAdmin(claims): AuthenticatedAdmin,
    payload: Result<Json<OrganizationRequest>, JsonRejection>,
) -> ApiResult<OrganizationView> {
    let body = validated_json(payload)?;
    Ok(Json(state.service.update(&claims, body.into()).await?))
}

pub async fn delete<R: TenantRepository + 'static>(
    State(state): State<AppState<R>>,
    AuthenticatedAdmin(claims): AuthenticatedAdmin,
    query: Result<Query<OrganizationQuery>, QueryRejection>,
) -> ApiResult<DeleteOutput> {
    let params = validated_query(query)?;
    Ok(Json(
        state
            .service
            .delete(&claims, &params.organization_name)
            .await?,
    ))
}

pub async fn verify<R: TenantRepository + 'static>(
    State(state): State<AppState<R>>,
    AuthenticatedAdmin(claims): AuthenticatedAdmin,
) -> ApiResult<ConsistencyReport> {
    Ok(Json(state.service.verify(&claims).await?))
}

pub async fn login<R: TenantRepository + 'static>(
    State(state): State<AppState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginOutput> {
    let body = validated_json(payload)?;
    Ok(Json(state.service.login(body.into()).await?))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
