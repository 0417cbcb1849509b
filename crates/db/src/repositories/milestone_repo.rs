//! Repository for the `milestones` and `milestone_dependencies` tables.

use std::collections::HashMap;

use sqlx::{Sqlite, SqlitePool, Transaction};
use timeline_core::types::{Date, DbId};

use crate::models::milestone::{DueMilestone, Milestone, MilestoneValues};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, description, start_date, due_date, duration, \
                        status, created_at, updated_at";

/// Provides CRUD operations for milestones and their dependency links.
pub struct MilestoneRepo;

impl MilestoneRepo {
    /// Insert a milestone and its dependency links in one transaction.
    pub async fn create(
        pool: &SqlitePool,
        project_id: DbId,
        values: &MilestoneValues,
        dependency_ids: &[DbId],
    ) -> Result<Milestone, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO milestones (project_id, name, description, start_date, due_date, duration, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let milestone = sqlx::query_as::<_, Milestone>(&query)
            .bind(project_id)
            .bind(&values.name)
            .bind(&values.description)
            .bind(values.start_date)
            .bind(values.due_date)
            .bind(values.duration)
            .bind(&values.status)
            .fetch_one(&mut *tx)
            .await?;

        insert_dependencies(&mut tx, milestone.id, dependency_ids).await?;
        tx.commit().await?;
        Ok(milestone)
    }

    /// Find a milestone by its internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM milestones WHERE id = $1");
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's milestones ordered by start date, due date, then id.
    pub async fn list_by_project(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM milestones
             WHERE project_id = $1
             ORDER BY start_date ASC, due_date ASC, id ASC"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every column of a milestone. When `dependency_ids` is `Some`
    /// the dependency set is replaced in the same transaction.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        values: &MilestoneValues,
        dependency_ids: Option<&[DbId]>,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE milestones SET
                name = $2,
                description = $3,
                start_date = $4,
                due_date = $5,
                duration = $6,
                status = $7,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let milestone = sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(&values.name)
            .bind(&values.description)
            .bind(values.start_date)
            .bind(values.due_date)
            .bind(values.duration)
            .bind(&values.status)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(milestone) = milestone else {
            return Ok(None);
        };

        if let Some(ids) = dependency_ids {
            sqlx::query("DELETE FROM milestone_dependencies WHERE milestone_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_dependencies(&mut tx, id, ids).await?;
        }

        tx.commit().await?;
        Ok(Some(milestone))
    }

    /// Change only the status. Returns `None` if the milestone does not exist.
    pub async fn set_status(
        pool: &SqlitePool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!(
            "UPDATE milestones SET
                status = $2,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a milestone. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM milestones WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Ids of every milestone in the project.
    pub async fn ids_for_project(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM milestones WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Ids of the milestones `milestone_id` depends on, ascending.
    pub async fn dependency_ids(
        pool: &SqlitePool,
        milestone_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT depends_on_id FROM milestone_dependencies
             WHERE milestone_id = $1
             ORDER BY depends_on_id",
        )
        .bind(milestone_id)
        .fetch_all(pool)
        .await
    }

    /// All `(milestone_id, depends_on_id)` links whose milestone belongs to the project.
    pub async fn project_edges(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        sqlx::query_as::<_, (DbId, DbId)>(
            "SELECT d.milestone_id, d.depends_on_id
             FROM milestone_dependencies d
             JOIN milestones m ON m.id = d.milestone_id
             WHERE m.project_id = $1
             ORDER BY d.milestone_id, d.depends_on_id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Dependency ids for every milestone of the project, keyed by milestone id.
    pub async fn dependency_map(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<HashMap<DbId, Vec<DbId>>, sqlx::Error> {
        let mut map: HashMap<DbId, Vec<DbId>> = HashMap::new();
        for (from, to) in Self::project_edges(pool, project_id).await? {
            map.entry(from).or_default().push(to);
        }
        Ok(map)
    }

    /// Milestones due in `[from, to]` that are not completed and belong to a
    /// project that is not archived.
    pub async fn list_due_between(
        pool: &SqlitePool,
        from: Date,
        to: Date,
    ) -> Result<Vec<DueMilestone>, sqlx::Error> {
        sqlx::query_as::<_, DueMilestone>(
            "SELECT m.id, m.name, m.due_date, m.project_id,
                    p.name AS project_name, p.owner_id
             FROM milestones m
             JOIN projects p ON p.id = m.project_id
             WHERE m.due_date BETWEEN $1 AND $2
               AND m.status <> 'completed'
               AND p.is_archived = false
             ORDER BY m.due_date ASC, m.id ASC",
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }
}

async fn insert_dependencies(
    tx: &mut Transaction<'_, Sqlite>,
    milestone_id: DbId,
    dependency_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    for depends_on_id in dependency_ids {
        sqlx::query(
            "INSERT INTO milestone_dependencies (milestone_id, depends_on_id) VALUES ($1, $2)",
        )
        .bind(milestone_id)
        .bind(depends_on_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
