//! Data integrity checks across the whole database.

use sqlx::SqlitePool;
use timeline_core::diagnostics::{build_report, DiagnosticReport, MilestoneRecord, ProjectRange};
use timeline_core::types::DbId;

use crate::models::diagnostics::{MilestoneRecordRow, ProjectRangeRow};
use crate::repositories::UserRepo;

pub struct DiagnosticRepo;

impl DiagnosticRepo {
    /// Load every project, milestone and link and run the integrity checks.
    pub async fn run(pool: &SqlitePool) -> Result<DiagnosticReport, sqlx::Error> {
        let total_users = UserRepo::count(pool).await?;

        let projects: Vec<ProjectRange> = sqlx::query_as::<_, ProjectRangeRow>(
            "SELECT id, name, start_date, end_date FROM projects ORDER BY id",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|r| ProjectRange {
            id: r.id,
            name: r.name,
            start_date: r.start_date,
            end_date: r.end_date,
        })
        .collect();

        let milestones: Vec<MilestoneRecord> = sqlx::query_as::<_, MilestoneRecordRow>(
            "SELECT id, project_id, name, start_date, due_date, duration FROM milestones ORDER BY id",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|r| MilestoneRecord {
            id: r.id,
            project_id: r.project_id,
            name: r.name,
            start_date: r.start_date,
            due_date: r.due_date,
            duration: r.duration,
        })
        .collect();

        let owner_links = sqlx::query_as::<_, (DbId, DbId)>(
            "SELECT p.id, p.owner_id FROM projects p
             JOIN project_collaborators c ON c.project_id = p.id AND c.user_id = p.owner_id
             ORDER BY p.id",
        )
        .fetch_all(pool)
        .await?;

        let edges = sqlx::query_as::<_, (DbId, DbId)>(
            "SELECT milestone_id, depends_on_id FROM milestone_dependencies
             ORDER BY milestone_id, depends_on_id",
        )
        .fetch_all(pool)
        .await?;

        let report = build_report(total_users, &projects, &milestones, &owner_links, &edges);
        tracing::debug!(issues = report.issues.len(), "Integrity checks complete");
        Ok(report)
    }
}
