//! HTTP tests driving the router against in-memory SurrealDB.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use orgreg_auth::config::AuthConfig;
use orgreg_db::SurrealTenantRepository;
use orgreg_server::router;
use orgreg_service::OrganizationService;
use serde_json::{Value, json};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use tower::ServiceExt;

async fn app() -> Router {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    orgreg_db::run_migrations(&db).await.unwrap();
    let service = OrganizationService::new(
        SurrealTenantRepository::new(db),
        AuthConfig::with_secret("api-test-secret-at-least-32-bytes!!"),
    );
    router(Arc::new(service))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create(app: &Router, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/org/create",
        None,
        Some(json!({"organization_name": name, "email": email, "password": password})),
    )
    .await
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/admin/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn organization_scenario() {
    let app = app().await;

    let (status, body) = create(&app, "Acme", "a@x.com", "pw1").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["collection_name"], "org_Acme");
    assert_eq!(body["message"], "Organization created successfully");

    let (status, body) = send(&app, Method::GET, "/org/get?organization_name=Acme", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["collection_name"], "org_Acme");
    assert_eq!(body["admin_email"], "a@x.com");

    let (status, body) = create(&app, "Acme", "b@x.com", "pw1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Organization name already exists");

    let token = login(&app, "a@x.com", "pw1").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/org/update",
        Some(&token),
        Some(json!({"organization_name": "Acme2", "email": "a@x.com", "password": "pw2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["collection_name"], "org_Acme2");
    assert_eq!(body["message"], "Organization updated and data migrated");

    let (status, _) = send(&app, Method::GET, "/org/get?organization_name=Acme", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/org/delete?organization_name=Acme2",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Not authorized to delete this organization");

    let fresh = login(&app, "a@x.com", "pw2").await;
    let (status, body) = send(
        &app,
        Method::DELETE,
        "/org/delete?organization_name=Acme2",
        Some(&fresh),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Organization Acme2 and its data deleted");

    let (status, body) = send(&app, Method::GET, "/org/get?organization_name=Acme2", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Organization not found");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = app().await;
    create(&app, "Acme", "a@x.com", "pw").await;
    let (status, body) = create(&app, "Globex", "a@x.com", "pw").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "duplicate_admin");
    assert_eq!(body["detail"], "Admin email already registered");
}

#[tokio::test]
async fn invalid_input_is_unprocessable() {
    let app = app().await;

    let (status, body) = create(&app, "bad name", "a@x.com", "pw").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert!(body["detail"].as_str().unwrap().contains("organization_name"));

    let (status, body) = create(&app, "Acme", "not-an-email", "pw").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("email"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/org/create",
        None,
        Some(json!({"organization_name": "Acme"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::GET, "/org/get", None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn login_failures_share_one_response() {
    let app = app().await;
    create(&app, "Acme", "a@x.com", "pw").await;

    let wrong = send(
        &app,
        Method::POST,
        "/admin/login",
        None,
        Some(json!({"email": "a@x.com", "password": "nope"})),
    )
    .await;
    let unknown = send(
        &app,
        Method::POST,
        "/admin/login",
        None,
        Some(json!({"email": "ghost@x.com", "password": "pw"})),
    )
    .await;

    assert_eq!(wrong.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, unknown);
    assert_eq!(wrong.1["detail"], "Invalid credentials");
}

#[tokio::test]
async fn protected_routes_require_bearer_token() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/org/verify", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Missing Token");

    let (status, body) = send(&app, Method::GET, "/org/verify", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid Token");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/org/update",
        None,
        Some(json!({"organization_name": "Acme", "email": "a@x.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn verify_reports_consistent_organization() {
    let app = app().await;
    create(&app, "Acme", "a@x.com", "pw").await;
    let token = login(&app, "a@x.com", "pw").await;

    let (status, body) = send(&app, Method::GET, "/org/verify", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["organization_name"], "Acme");
    assert_eq!(body["consistent"], true);
    assert_eq!(body["violations"], json!([]));
}
