//! Repository for the `projects` table.

use sqlx::SqlitePool;
use timeline_core::types::{Date, DbId};

use crate::models::project::{CreateProject, Project, ProjectListItem, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, start_date, end_date, owner_id, is_archived, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `owner_id`, returning the created row.
    pub async fn create(
        pool: &SqlitePool,
        owner_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, start_date, end_date, owner_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects the user owns or collaborates on, newest first.
    ///
    /// `archived` selects the dashboard (`false`) or the archive (`true`).
    pub async fn list_for_user(
        pool: &SqlitePool,
        user_id: DbId,
        archived: bool,
    ) -> Result<Vec<ProjectListItem>, sqlx::Error> {
        sqlx::query_as::<_, ProjectListItem>(
            "SELECT p.id, p.name, p.description, p.start_date, p.end_date, p.owner_id,
                    u.username AS owner_username, p.is_archived,
                    (p.owner_id = $1) AS is_owner,
                    (SELECT COUNT(*) FROM milestones m WHERE m.project_id = p.id) AS milestone_count,
                    p.created_at, p.updated_at
             FROM projects p
             JOIN users u ON u.id = p.owner_id
             WHERE p.is_archived = $2
               AND (p.owner_id = $1
                    OR EXISTS (SELECT 1 FROM project_collaborators c
                               WHERE c.project_id = p.id AND c.user_id = $1))
             ORDER BY p.created_at DESC, p.id DESC",
        )
        .bind(user_id)
        .bind(archived)
        .fetch_all(pool)
        .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// An empty `description` clears it. Returns `None` if no row with the
    /// given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 IS NULL THEN description ELSE NULLIF($3, '') END,
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Set the archived flag. Returns `None` if the project does not exist.
    pub async fn set_archived(
        pool: &SqlitePool,
        id: DbId,
        archived: bool,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                is_archived = $2,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(archived)
            .fetch_optional(pool)
            .await
    }

    /// Count milestones of the project that fall outside `[start_date, end_date]`.
    pub async fn count_milestones_outside(
        pool: &SqlitePool,
        id: DbId,
        start_date: Date,
        end_date: Date,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM milestones
             WHERE project_id = $1
               AND (start_date < $2 OR due_date > $3)",
        )
        .bind(id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(pool)
        .await
    }

    /// Permanently delete a project by ID. Collaborators, milestones and
    /// notifications go with it. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
