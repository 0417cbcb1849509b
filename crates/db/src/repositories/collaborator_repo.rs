//! Repository for the `project_collaborators` table.

use sqlx::SqlitePool;
use timeline_core::types::DbId;

use crate::models::project::Collaborator;

/// Provides membership operations for project collaborators.
pub struct CollaboratorRepo;

impl CollaboratorRepo {
    /// Add a collaborator. Fails with a unique violation if already present.
    pub async fn add(pool: &SqlitePool, project_id: DbId, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO project_collaborators (project_id, user_id) VALUES ($1, $2)")
            .bind(project_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Remove a collaborator. Returns `true` if a link was removed.
    pub async fn remove(
        pool: &SqlitePool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_collaborators WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether the user is a collaborator on the project.
    pub async fn is_collaborator(
        pool: &SqlitePool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM project_collaborators
                            WHERE project_id = $1 AND user_id = $2)",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// List collaborators with their usernames, in the order they were added.
    pub async fn list_for_project(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<Vec<Collaborator>, sqlx::Error> {
        sqlx::query_as::<_, Collaborator>(
            "SELECT c.user_id, u.username, u.email, c.created_at AS added_at
             FROM project_collaborators c
             JOIN users u ON u.id = c.user_id
             WHERE c.project_id = $1
             ORDER BY c.created_at ASC, c.user_id ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// User ids of every collaborator on the project.
    pub async fn user_ids(pool: &SqlitePool, project_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT user_id FROM project_collaborators WHERE project_id = $1 ORDER BY user_id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
