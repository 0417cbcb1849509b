mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_project, delete_auth, get_auth, post_json_auth,
    user_with_token,
};
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../db/migrations")]
async fn share_adds_collaborator_and_one_notification(pool: SqlitePool) {
    let (_, owner_token) = user_with_token(&pool, "olivia").await;
    let (carl, carl_token) = user_with_token(&pool, "carl").await;
    let id = create_project(&pool, &owner_token, "Roadmap", "2025-01-01", "2025-03-31").await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{id}/share"),
        json!({ "email": "  CARL@Example.com " }),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user_id"], carl.id);
    assert_eq!(json["data"]["username"], "carl");

    let notifications = body_json(
        get_auth(build_test_app(pool.clone()), "/api/v1/notifications", &carl_token).await,
    )
    .await;
    let items = notifications["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["notification_type"], "project_shared");
    assert_eq!(items[0]["project_id"], id);
    assert_eq!(
        items[0]["message"],
        "olivia shared the project 'Roadmap' with you."
    );

    let dashboard = body_json(get_auth(build_test_app(pool), "/api/v1/projects", &carl_token).await).await;
    assert_eq!(dashboard["data"][0]["id"], id);
    assert_eq!(dashboard["data"][0]["is_owner"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn share_errors(pool: SqlitePool) {
    let (_, owner_token) = user_with_token(&pool, "olivia").await;
    user_with_token(&pool, "carl").await;
    let id = create_project(&pool, &owner_token, "Roadmap", "2025-01-01", "2025-03-31").await;
    let uri = format!("/api/v1/projects/{id}/share");

    let unknown = post_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "email": "nobody@example.com" }),
        &owner_token,
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let myself = post_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "email": "olivia@example.com" }),
        &owner_token,
    )
    .await;
    assert_eq!(myself.status(), StatusCode::BAD_REQUEST);

    let first = post_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "email": "carl@example.com" }),
        &owner_token,
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let again = post_json_auth(
        build_test_app(pool),
        &uri,
        json!({ "email": "carl@example.com" }),
        &owner_token,
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn removing_collaborator_revokes_access(pool: SqlitePool) {
    let (_, owner_token) = user_with_token(&pool, "olivia").await;
    let (carl, carl_token) = user_with_token(&pool, "carl").await;
    let id = create_project(&pool, &owner_token, "Roadmap", "2025-01-01", "2025-03-31").await;
    common::share_project(&pool, &owner_token, id, "carl@example.com").await;

    let uri = format!("/api/v1/projects/{id}/collaborators/{}", carl.id);

    let by_collaborator = delete_auth(build_test_app(pool.clone()), &uri, &carl_token).await;
    assert_eq!(by_collaborator.status(), StatusCode::FORBIDDEN);

    let removed = delete_auth(build_test_app(pool.clone()), &uri, &owner_token).await;
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);

    let again = delete_auth(build_test_app(pool.clone()), &uri, &owner_token).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    let detail = get_auth(
        build_test_app(pool),
        &format!("/api/v1/projects/{id}"),
        &carl_token,
    )
    .await;
    assert_eq!(detail.status(), StatusCode::FORBIDDEN);
}
