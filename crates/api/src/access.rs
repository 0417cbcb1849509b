//! Project membership checks shared by every project-scoped handler.

use timeline_core::error::CoreError;
use timeline_core::project::{resolve_access, ProjectAccess};
use timeline_core::types::DbId;
use timeline_db::models::project::Project;
use timeline_db::repositories::{CollaboratorRepo, ProjectRepo};
use timeline_db::DbPool;

use crate::error::{AppError, AppResult};

/// A project together with the caller's relation to it.
#[derive(Debug)]
pub struct ProjectContext {
    pub project: Project,
    pub access: ProjectAccess,
}

impl ProjectContext {
    /// Fail with 403 unless the caller owns the project.
    pub fn require_owner(self) -> AppResult<Project> {
        if self.access.can_edit() {
            Ok(self.project)
        } else {
            Err(AppError::forbidden(
                "Only the project owner can make changes to this project",
            ))
        }
    }
}

/// Load a project the caller owns or collaborates on.
///
/// A missing project is 404 and a project the caller has no part in is 403.
pub async fn load_project(
    pool: &DbPool,
    project_id: DbId,
    user_id: DbId,
) -> AppResult<ProjectContext> {
    let project = ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let is_collaborator = project.owner_id != user_id
        && CollaboratorRepo::is_collaborator(pool, project_id, user_id).await?;

    let access = resolve_access(project.owner_id, user_id, is_collaborator)
        .ok_or_else(|| AppError::forbidden("You do not have access to this project"))?;

    Ok(ProjectContext { project, access })
}

/// Load a project the caller owns.
pub async fn load_owned_project(
    pool: &DbPool,
    project_id: DbId,
    user_id: DbId,
) -> AppResult<Project> {
    load_project(pool, project_id, user_id).await?.require_owner()
}
