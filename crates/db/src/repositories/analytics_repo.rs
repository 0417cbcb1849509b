//! Read-only queries feeding the analytics summary.

use sqlx::SqlitePool;
use timeline_core::types::DbId;

use crate::models::analytics::{MilestoneFactRow, ProjectFactRow};

/// Visibility filter: projects owned by or shared with `$1`.
const VISIBLE: &str = "(p.owner_id = $1 OR EXISTS (SELECT 1 FROM project_collaborators c \
                        WHERE c.project_id = p.id AND c.user_id = $1))";

pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Every project the user owns or collaborates on, archived included.
    pub async fn project_facts(
        pool: &SqlitePool,
        user_id: DbId,
    ) -> Result<Vec<ProjectFactRow>, sqlx::Error> {
        let query = format!(
            "SELECT p.id, p.name, p.is_archived FROM projects p \
             WHERE {VISIBLE} \
             ORDER BY p.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, ProjectFactRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Status and due date of every milestone in those projects.
    pub async fn milestone_facts(
        pool: &SqlitePool,
        user_id: DbId,
    ) -> Result<Vec<MilestoneFactRow>, sqlx::Error> {
        let query = format!(
            "SELECT m.project_id, m.status, m.due_date FROM milestones m \
             JOIN projects p ON p.id = m.project_id \
             WHERE {VISIBLE}"
        );
        sqlx::query_as::<_, MilestoneFactRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
