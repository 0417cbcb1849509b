//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use timeline_core::error::CoreError;
use timeline_core::project::{validate_date_range, validate_name, ProjectAccess};
use timeline_core::types::DbId;
use timeline_db::models::milestone::MilestoneWithDependencies;
use timeline_db::models::project::{
    Collaborator, CreateProject, Project, ProjectListItem, UpdateProject,
};
use timeline_db::repositories::{CollaboratorRepo, ProjectRepo, UserRepo};

use crate::access::{load_owned_project, load_project};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProjectOwner {
    pub id: DbId,
    pub username: String,
}

/// Everything the project page shows.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub owner: ProjectOwner,
    /// The caller's relation to the project.
    pub access: ProjectAccess,
    pub collaborators: Vec<Collaborator>,
    pub milestones: Vec<MilestoneWithDependencies>,
}

/// Empty or whitespace-only descriptions are stored as `NULL`.
fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// GET /api/v1/projects
///
/// Active projects the caller owns or collaborates on, newest first.
pub async fn list_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ProjectListItem>>>> {
    let projects = ProjectRepo::list_for_user(&state.pool, auth.user_id, false).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/archived
pub async fn list_archived(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ProjectListItem>>>> {
    let projects = ProjectRepo::list_for_user(&state.pool, auth.user_id, true).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let name = validate_name(&input.name).map_err(AppError::validation)?;
    validate_date_range(input.start_date, input.end_date).map_err(AppError::validation)?;

    let input = CreateProject {
        name,
        description: clean_description(input.description),
        ..input
    };
    let project = ProjectRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(project_id = project.id, owner_id = auth.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let ctx = load_project(&state.pool, id, auth.user_id).await?;

    let owner = UserRepo::find_by_id(&state.pool, ctx.project.owner_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: ctx.project.owner_id,
        }))?;

    let collaborators = CollaboratorRepo::list_for_project(&state.pool, id).await?;
    let milestones = super::milestone::with_dependencies(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: ProjectDetail {
            project: ctx.project,
            owner: ProjectOwner {
                id: owner.id,
                username: owner.username,
            },
            access: ctx.access,
            collaborators,
            milestones,
        },
    }))
}

/// PUT /api/v1/projects/{id}
///
/// Partial update. The merged date range must still hold every milestone,
/// and a blank description clears the stored one.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = load_owned_project(&state.pool, id, auth.user_id).await?;

    let name = input
        .name
        .as_deref()
        .map(validate_name)
        .transpose()
        .map_err(AppError::validation)?;

    let start_date = input.start_date.unwrap_or(project.start_date);
    let end_date = input.end_date.unwrap_or(project.end_date);
    validate_date_range(start_date, end_date).map_err(AppError::validation)?;

    if input.start_date.is_some() || input.end_date.is_some() {
        let outside =
            ProjectRepo::count_milestones_outside(&state.pool, id, start_date, end_date).await?;
        if outside > 0 {
            return Err(AppError::validation(format!(
                "{outside} milestone(s) fall outside the new project dates ({start_date} to {end_date})"
            )));
        }
    }

    let input = UpdateProject {
        name,
        description: input.description.map(|d| d.trim().to_string()),
        start_date: input.start_date,
        end_date: input.end_date,
    };
    let updated = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/projects/{id}
///
/// Removes the project with its milestones, collaborators and notifications.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned_project(&state.pool, id, auth.user_id).await?;

    if ProjectRepo::delete(&state.pool, id).await? {
        tracing::info!(project_id = id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}

/// POST /api/v1/projects/{id}/archive
pub async fn archive(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    set_archived(&state, auth.user_id, id, true).await
}

/// POST /api/v1/projects/{id}/unarchive
pub async fn unarchive(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    set_archived(&state, auth.user_id, id, false).await
}

async fn set_archived(
    state: &AppState,
    user_id: DbId,
    id: DbId,
    archived: bool,
) -> AppResult<Json<DataResponse<Project>>> {
    load_owned_project(&state.pool, id, user_id).await?;

    let project = ProjectRepo::set_archived(&state.pool, id, archived)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    tracing::info!(project_id = id, archived, "Project archive state changed");
    Ok(Json(DataResponse { data: project }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_description_becomes_none() {
        assert_eq!(clean_description(Some("   ".into())), None);
        assert_eq!(clean_description(None), None);
        assert_eq!(
            clean_description(Some("  Q3 plan ".into())),
            Some("Q3 plan".to_string())
        );
    }
}
