//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use timeline_api::auth::jwt::JwtConfig;
use timeline_api::auth::password::hash_password;
use timeline_api::config::ServerConfig;
use timeline_api::router::build_app_router;
use timeline_api::state::AppState;
use timeline_core::roles::{ADMIN_ROLE_ID, DEFAULT_ROLE_ID};
use timeline_core::types::DbId;
use timeline_db::models::user::{CreateUser, User};
use timeline_db::repositories::UserRepo;
use timeline_events::EventBus;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "milestone-pass";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        min_password_length: 8,
        milestone_due_window_days: 3,
        milestone_sweep_interval_secs: 3600,
        session_cleanup_interval_secs: 3600,
        jwt: JwtConfig {
            secret: "timeline-integration-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// The production router over the given pool.
pub fn build_test_app(pool: SqlitePool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn send(app: Router, request: Request<Body>) -> axum::response::Response {
    app.oneshot(request).await.unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> axum::response::Response {
    send(app, request("GET", uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> axum::response::Response {
    send(app, request("GET", uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> axum::response::Response {
    send(app, request("POST", uri, None, Some(body))).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: Value,
    token: &str,
) -> axum::response::Response {
    send(app, request("POST", uri, Some(token), Some(body))).await
}

/// POST without a body.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> axum::response::Response {
    send(app, request("POST", uri, Some(token), None)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: Value,
    token: &str,
) -> axum::response::Response {
    send(app, request("PUT", uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> axum::response::Response {
    send(app, request("DELETE", uri, Some(token), None)).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_test_user(pool: &SqlitePool, username: &str) -> User {
    insert_user(pool, username, DEFAULT_ROLE_ID).await
}

pub async fn create_test_admin(pool: &SqlitePool, username: &str) -> User {
    insert_user(pool, username, ADMIN_ROLE_ID).await
}

async fn insert_user(pool: &SqlitePool, username: &str, role_id: DbId) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role_id,
        },
    )
    .await
    .unwrap()
}

/// Log in and return the access token.
pub async fn login_user(app: Router, username: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "username": username, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login for {username} failed");
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Create a user and log them in in one step.
pub async fn user_with_token(pool: &SqlitePool, username: &str) -> (User, String) {
    let user = create_test_user(pool, username).await;
    let token = login_user(build_test_app(pool.clone()), username).await;
    (user, token)
}

/// Create a project through the API and return its id.
pub async fn create_project(
    pool: &SqlitePool,
    token: &str,
    name: &str,
    start_date: &str,
    end_date: &str,
) -> DbId {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/projects",
        serde_json::json!({
            "name": name,
            "start_date": start_date,
            "end_date": end_date,
        }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Share a project through the API.
pub async fn share_project(pool: &SqlitePool, token: &str, project_id: DbId, email: &str) {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/share"),
        serde_json::json!({ "email": email }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}
