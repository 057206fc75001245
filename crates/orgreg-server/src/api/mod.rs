//! HTTP API: router, shared state and route handlers.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    routing::{delete, get, post, put},
};
use orgreg_auth::config::AuthConfig;
use orgreg_core::repository::TenantRepository;
use orgreg_service::OrganizationService;
use tower_http::trace::TraceLayer;

/// State shared by every handler.
pub struct AppState<R: TenantRepository> {
    pub service: Arc<OrganizationService<R>>,
    pub auth: Arc<AuthConfig>,
}

// Manual impl: derive would require `R: Clone`.
impl<R: TenantRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            auth: Arc::clone(&self.auth),
        }
    }
}

impl<R: TenantRepository> FromRef<AppState<R>> for Arc<AuthConfig> {
    fn from_ref(state: &AppState<R>) -> Self {
        Arc::clone(&state.auth)
    }
}

/// Build the application router around a lifecycle service.
pub fn router<R: TenantRepository + 'static>(service: Arc<OrganizationService<R>>) -> Router {
    let state = AppState {
        auth: Arc::new(service.config().clone()),
        service,
    };

    Router::new()
        .route("/org/create", post(handlers::create::<R>))
        .route("/org/get", get(handlers::get::<R>))
        .route("/org/update", put(handlers::update::<R>))
        .route("/org/delete", delete(handlers::delete::<R>))
        .route("/org/verify", get(handlers::verify::<R>))
        .route("/admin/login", post(handlers::login::<R>))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
