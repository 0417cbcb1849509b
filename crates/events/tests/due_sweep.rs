//! Integration tests for the milestone due sweep.

use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use timeline_db::models::milestone::MilestoneValues;
use timeline_db::models::project::CreateProject;
use timeline_db::models::user::CreateUser;
use timeline_db::repositories::{
    CollaboratorRepo, MilestoneRepo, NotificationRepo, ProjectRepo, UserRepo,
};
use timeline_events::bus::EVENT_MILESTONE_DUE;
use timeline_events::{EventBus, MilestoneDueSweep};

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

async fn user(pool: &SqlitePool, name: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "hash".to_string(),
            role_id: 2,
        },
    )
    .await
    .unwrap()
    .id
}

/// Owner plus one collaborator, one milestone due on 2025-01-12.
async fn seed(pool: &SqlitePool) -> (i64, i64, i64) {
    let owner = user(pool, "alice").await;
    let collaborator = user(pool, "bob").await;
    let project = ProjectRepo::create(
        pool,
        owner,
        &CreateProject {
            name: "Roadmap".to_string(),
            description: None,
            start_date: d("2025-01-01"),
            end_date: d("2025-01-31"),
        },
    )
    .await
    .unwrap();
    CollaboratorRepo::add(pool, project.id, collaborator).await.unwrap();
    MilestoneRepo::create(
        pool,
        project.id,
        &MilestoneValues {
            name: "Beta".to_string(),
            description: None,
            start_date: d("2025-01-10"),
            due_date: d("2025-01-12"),
            duration: 3,
            status: "in_progress".to_string(),
        },
        &[],
    )
    .await
    .unwrap();
    (owner, collaborator, project.id)
}

#[sqlx::test(migrations = "../db/migrations")]
async fn notifies_owner_and_collaborators(pool: SqlitePool) {
    let (owner, collaborator, _) = seed(&pool).await;
    let bus = Arc::new(EventBus::default());
    let mut rx = bus.subscribe();
    let sweep = MilestoneDueSweep::new(pool.clone(), bus.clone(), 3);

    let report = sweep.run_once(d("2025-01-10")).await.unwrap();
    assert_eq!(report.milestones_checked, 1);
    assert_eq!(report.notifications_created, 2);

    for user_id in [owner, collaborator] {
        let list = NotificationRepo::list_for_user(&pool, user_id, false, 50, 0).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].notification_type, "milestone_due");
        assert_eq!(list[0].message, "Milestone 'Beta' is due in 2 days.");
    }

    let event = rx.recv().await.unwrap();
    assert_eq!(event.event_type, EVENT_MILESTONE_DUE);
    assert_eq!(event.recipient_user_id, Some(owner));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn repeated_sweep_skips_unread_reminders(pool: SqlitePool) {
    let (owner, collaborator, _) = seed(&pool).await;
    let sweep = MilestoneDueSweep::new(pool.clone(), Arc::new(EventBus::default()), 3);

    sweep.run_once(d("2025-01-10")).await.unwrap();
    let second = sweep.run_once(d("2025-01-11")).await.unwrap();
    assert_eq!(second.notifications_created, 0);
    assert_eq!(second.skipped_existing, 2);

    // Once read, the next sweep reminds again.
    NotificationRepo::mark_all_read(&pool, owner, chrono::Utc::now()).await.unwrap();
    let third = sweep.run_once(d("2025-01-11")).await.unwrap();
    assert_eq!(third.notifications_created, 1);
    assert_eq!(NotificationRepo::unread_count(&pool, owner).await.unwrap(), 1);
    assert_eq!(NotificationRepo::unread_count(&pool, collaborator).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_sweeps_create_each_reminder_once(pool: SqlitePool) {
    let (owner, collaborator, _) = seed(&pool).await;
    let bus = Arc::new(EventBus::default());
    let periodic = MilestoneDueSweep::new(pool.clone(), bus.clone(), 3);
    let on_demand = MilestoneDueSweep::new(pool.clone(), bus, 3);

    let (a, b) = tokio::join!(
        periodic.run_once(d("2025-01-10")),
        on_demand.run_once(d("2025-01-10")),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.notifications_created + b.notifications_created, 2);
    assert_eq!(a.skipped_existing + b.skipped_existing, 2);
    assert_eq!(NotificationRepo::unread_count(&pool, owner).await.unwrap(), 1);
    assert_eq!(NotificationRepo::unread_count(&pool, collaborator).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn outside_window_and_archived_are_ignored(pool: SqlitePool) {
    let (owner, _, project) = seed(&pool).await;
    let sweep = MilestoneDueSweep::new(pool.clone(), Arc::new(EventBus::default()), 3);

    // Due on the 12th, window from the 5th reaches the 8th.
    let early = sweep.run_once(d("2025-01-05")).await.unwrap();
    assert_eq!(early.milestones_checked, 0);

    ProjectRepo::set_archived(&pool, project, true).await.unwrap();
    let archived = sweep.run_once(d("2025-01-10")).await.unwrap();
    assert_eq!(archived.milestones_checked, 0);
    assert_eq!(NotificationRepo::unread_count(&pool, owner).await.unwrap(), 0);
}
