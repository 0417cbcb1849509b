mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_project, delete_auth, get_auth, post_auth, post_json_auth,
    put_json_auth, share_project, user_with_token,
};
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../db/migrations")]
async fn create_project_makes_caller_owner(pool: SqlitePool) {
    let (owner, token) = user_with_token(&pool, "olivia").await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/projects",
        json!({
            "name": "  Launch  ",
            "description": "Public launch",
            "start_date": "2025-03-01",
            "end_date": "2025-04-30",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Launch");
    assert_eq!(json["data"]["owner_id"], owner.id);
    assert_eq!(json["data"]["is_archived"], false);

    let list = get_auth(build_test_app(pool), "/api/v1/projects", &token).await;
    let json = body_json(list).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["is_owner"], true);
    assert_eq!(items[0]["owner_username"], "olivia");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn end_before_start_is_rejected(pool: SqlitePool) {
    let (_, token) = user_with_token(&pool, "olivia").await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/projects",
        json!({ "name": "Backwards", "start_date": "2025-05-10", "end_date": "2025-05-01" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("must be on or after start date"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn outsiders_are_forbidden_from_project_views(pool: SqlitePool) {
    let (_, owner_token) = user_with_token(&pool, "olivia").await;
    let (_, outsider_token) = user_with_token(&pool, "mallory").await;
    let id = create_project(&pool, &owner_token, "Private", "2025-01-01", "2025-01-31").await;

    for uri in [
        format!("/api/v1/projects/{id}"),
        format!("/api/v1/projects/{id}/export/csv"),
        format!("/api/v1/projects/{id}/export/pdf"),
        format!("/api/v1/projects/{id}/gantt"),
        format!("/api/v1/projects/{id}/milestones"),
    ] {
        let response = get_auth(build_test_app(pool.clone()), &uri, &outsider_token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_project_is_not_found(pool: SqlitePool) {
    let (_, token) = user_with_token(&pool, "olivia").await;

    let response = get_auth(build_test_app(pool), "/api/v1/projects/9999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn detail_includes_owner_collaborators_and_milestones(pool: SqlitePool) {
    let (_, owner_token) = user_with_token(&pool, "olivia").await;
    let (_, collab_token) = user_with_token(&pool, "carl").await;
    let id = create_project(&pool, &owner_token, "Shared", "2025-01-01", "2025-01-31").await;
    share_project(&pool, &owner_token, id, "carl@example.com").await;

    post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{id}/milestones"),
        json!({ "name": "Kickoff", "due_date": "2025-01-03" }),
        &owner_token,
    )
    .await;

    let response = get_auth(
        build_test_app(pool),
        &format!("/api/v1/projects/{id}"),
        &collab_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["name"], "Shared");
    assert_eq!(data["owner"]["username"], "olivia");
    assert_eq!(data["access"], "collaborator");
    assert_eq!(data["collaborators"][0]["username"], "carl");
    assert_eq!(data["milestones"][0]["name"], "Kickoff");
    assert_eq!(data["milestones"][0]["dependency_ids"], json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn collaborators_cannot_modify(pool: SqlitePool) {
    let (_, owner_token) = user_with_token(&pool, "olivia").await;
    let (_, collab_token) = user_with_token(&pool, "carl").await;
    let id = create_project(&pool, &owner_token, "Shared", "2025-01-01", "2025-01-31").await;
    share_project(&pool, &owner_token, id, "carl@example.com").await;

    let update = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{id}"),
        json!({ "name": "Hijacked" }),
        &collab_token,
    )
    .await;
    assert_eq!(update.status(), StatusCode::FORBIDDEN);

    let archive = post_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{id}/archive"),
        &collab_token,
    )
    .await;
    assert_eq!(archive.status(), StatusCode::FORBIDDEN);

    let milestone = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{id}/milestones"),
        json!({ "name": "Sneaky", "due_date": "2025-01-10" }),
        &collab_token,
    )
    .await;
    assert_eq!(milestone.status(), StatusCode::FORBIDDEN);

    let delete = delete_auth(
        build_test_app(pool),
        &format!("/api/v1/projects/{id}"),
        &collab_token,
    )
    .await;
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn archive_moves_project_between_listings(pool: SqlitePool) {
    let (_, token) = user_with_token(&pool, "olivia").await;
    let id = create_project(&pool, &token, "Old work", "2025-01-01", "2025-01-31").await;

    let response = post_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{id}/archive"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_archived"], true);

    let dashboard = body_json(get_auth(build_test_app(pool.clone()), "/api/v1/projects", &token).await).await;
    assert!(dashboard["data"].as_array().unwrap().is_empty());

    let archived = body_json(
        get_auth(build_test_app(pool.clone()), "/api/v1/projects/archived", &token).await,
    )
    .await;
    assert_eq!(archived["data"][0]["id"], id);

    post_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{id}/unarchive"),
        &token,
    )
    .await;
    let dashboard = body_json(get_auth(build_test_app(pool), "/api/v1/projects", &token).await).await;
    assert_eq!(dashboard["data"][0]["id"], id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_rejects_range_that_strands_milestones(pool: SqlitePool) {
    let (_, token) = user_with_token(&pool, "olivia").await;
    let id = create_project(&pool, &token, "Tight", "2025-01-01", "2025-01-31").await;

    post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{id}/milestones"),
        json!({ "name": "Late", "due_date": "2025-01-25" }),
        &token,
    )
    .await;

    let shrink = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{id}"),
        json!({ "end_date": "2025-01-20" }),
        &token,
    )
    .await;
    assert_eq!(shrink.status(), StatusCode::BAD_REQUEST);

    let inverted = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{id}"),
        json!({ "start_date": "2025-02-15" }),
        &token,
    )
    .await;
    assert_eq!(inverted.status(), StatusCode::BAD_REQUEST);

    let ok = put_json_auth(
        build_test_app(pool),
        &format!("/api/v1/projects/{id}"),
        json!({ "name": "Roomy", "end_date": "2025-02-28" }),
        &token,
    )
    .await;
    assert_eq!(ok.status(), StatusCode::OK);
    let json = body_json(ok).await;
    assert_eq!(json["data"]["name"], "Roomy");
    assert_eq!(json["data"]["end_date"], "2025-02-28");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_trims_and_clears_description(pool: SqlitePool) {
    let (_, token) = user_with_token(&pool, "olivia").await;
    let id = create_project(&pool, &token, "Launch", "2025-01-01", "2025-01-31").await;
    let uri = format!("/api/v1/projects/{id}");

    let set = put_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "description": "  New scope " }),
        &token,
    )
    .await;
    assert_eq!(body_json(set).await["data"]["description"], "New scope");

    // Omitting the field keeps it.
    let rename = put_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "name": "Relaunch" }),
        &token,
    )
    .await;
    assert_eq!(body_json(rename).await["data"]["description"], "New scope");

    let clear = put_json_auth(
        build_test_app(pool),
        &uri,
        json!({ "description": "   " }),
        &token,
    )
    .await;
    assert_eq!(clear.status(), StatusCode::OK);
    assert!(body_json(clear).await["data"]["description"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_removes_project(pool: SqlitePool) {
    let (_, token) = user_with_token(&pool, "olivia").await;
    let id = create_project(&pool, &token, "Doomed", "2025-01-01", "2025-01-31").await;

    let response = delete_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(
        build_test_app(pool),
        &format!("/api/v1/projects/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
