mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    body_json, build_test_app, create_project, create_test_admin, get_auth, login_user, post_auth,
    post_json_auth, share_project, user_with_token,
};
use serde_json::json;
use sqlx::SqlitePool;

async fn admin_token(pool: &SqlitePool) -> String {
    create_test_admin(pool, "root").await;
    login_user(build_test_app(pool.clone()), "root").await
}

fn days_from_today(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days)).to_string()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_routes_reject_regular_users(pool: SqlitePool) {
    let (_, token) = user_with_token(&pool, "olivia").await;

    for uri in ["/api/v1/admin/users", "/api/v1/admin/diagnostics"] {
        let response = get_auth(build_test_app(pool.clone()), uri, &token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }

    let response = post_auth(
        build_test_app(pool),
        "/api/v1/admin/milestones/check-due",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_lists_users_with_roles(pool: SqlitePool) {
    user_with_token(&pool, "olivia").await;
    let token = admin_token(&pool).await;

    let response = get_auth(build_test_app(pool), "/api/v1/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let users = json["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);

    let root = users.iter().find(|u| u["username"] == "root").unwrap();
    assert_eq!(root["role"], "admin");
    let olivia = users.iter().find(|u| u["username"] == "olivia").unwrap();
    assert_eq!(olivia["role"], "user");
    assert!(olivia.get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn diagnostics_on_clean_data_reports_no_issues(pool: SqlitePool) {
    let (_, owner_token) = user_with_token(&pool, "olivia").await;
    let id = create_project(&pool, &owner_token, "Launch", "2025-01-01", "2025-01-31").await;
    post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{id}/milestones"),
        json!({ "name": "Kickoff", "start_date": "2025-01-02", "due_date": "2025-01-04" }),
        &owner_token,
    )
    .await;
    let token = admin_token(&pool).await;

    let response = get_auth(build_test_app(pool), "/api/v1/admin/diagnostics", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["total_users"], 2);
    assert_eq!(json["data"]["total_projects"], 1);
    assert_eq!(json["data"]["total_milestones"], 1);
    assert_eq!(json["data"]["issues"], json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn check_due_notifies_owner_and_collaborators_once(pool: SqlitePool) {
    let (_, owner_token) = user_with_token(&pool, "olivia").await;
    let (_, carl_token) = user_with_token(&pool, "carl").await;
    let id = create_project(
        &pool,
        &owner_token,
        "Launch",
        &days_from_today(-5),
        &days_from_today(30),
    )
    .await;
    share_project(&pool, &owner_token, id, "carl@example.com").await;

    for (name, due) in [("Soon", 2), ("Later", 10)] {
        post_json_auth(
            build_test_app(pool.clone()),
            &format!("/api/v1/projects/{id}/milestones"),
            json!({ "name": name, "due_date": days_from_today(due) }),
            &owner_token,
        )
        .await;
    }
    let token = admin_token(&pool).await;

    let first = post_auth(
        build_test_app(pool.clone()),
        "/api/v1/admin/milestones/check-due",
        &token,
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    let report = body_json(first).await;
    assert_eq!(report["data"]["milestones_checked"], 1);
    assert_eq!(report["data"]["notifications_created"], 2);

    let second = body_json(
        post_auth(
            build_test_app(pool.clone()),
            "/api/v1/admin/milestones/check-due",
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(second["data"]["notifications_created"], 0);
    assert_eq!(second["data"]["skipped_existing"], 2);

    let owner_notes = body_json(
        get_auth(build_test_app(pool.clone()), "/api/v1/notifications", &owner_token).await,
    )
    .await;
    let due: Vec<_> = owner_notes["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["notification_type"] == "milestone_due")
        .collect();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0]["message"], "Milestone 'Soon' is due in 2 days.");

    let carl_notes = body_json(
        get_auth(build_test_app(pool), "/api/v1/notifications?unread_only=true", &carl_token).await,
    )
    .await;
    assert!(carl_notes["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|n| n["notification_type"] == "milestone_due"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn analytics_summarizes_visible_projects(pool: SqlitePool) {
    let (_, owner_token) = user_with_token(&pool, "olivia").await;
    let (_, outsider_token) = user_with_token(&pool, "mallory").await;
    let id = create_project(&pool, &owner_token, "Launch", "2025-01-01", "2025-01-31").await;

    let mut milestone_ids = Vec::new();
    for name in ["Design", "Build"] {
        let response = post_json_auth(
            build_test_app(pool.clone()),
            &format!("/api/v1/projects/{id}/milestones"),
            json!({ "name": name, "due_date": "2025-01-20" }),
            &owner_token,
        )
        .await;
        milestone_ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
    }
    post_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{}/status/completed", milestone_ids[0]),
        &owner_token,
    )
    .await;

    let json = body_json(get_auth(build_test_app(pool.clone()), "/api/v1/analytics", &owner_token).await).await;
    let data = &json["data"];
    assert_eq!(data["total_projects"], 1);
    assert_eq!(data["total_milestones"], 2);
    assert_eq!(data["status_counts"]["completed"], 1);
    assert_eq!(data["status_counts"]["pending"], 1);
    assert_eq!(data["overdue_milestones"], 1);
    assert_eq!(data["completion_rate"], 50.0);
    assert_eq!(data["projects"][0]["completed_milestones"], 1);

    let other = body_json(get_auth(build_test_app(pool), "/api/v1/analytics", &outsider_token).await).await;
    assert_eq!(other["data"]["total_projects"], 0);
    assert_eq!(other["data"]["completion_rate"], 0.0);
}
