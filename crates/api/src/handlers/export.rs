//! CSV and PDF downloads of a project and its milestones.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use timeline_core::error::CoreError;
use timeline_core::export::{
    attachment_filename, render, ExportFormat, MilestoneExport, ProjectExport,
};
use timeline_core::milestone::MilestoneStatus;
use timeline_core::types::DbId;
use timeline_db::repositories::{MilestoneRepo, UserRepo};

use crate::access::load_project;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/export/{format}
///
/// `format` is `csv` or `pdf`; anything else is a 400 once access is granted.
pub async fn export_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, format)): Path<(DbId, String)>,
) -> AppResult<Response> {
    let project = load_project(&state.pool, id, auth.user_id).await?.project;
    let format = format.parse::<ExportFormat>().map_err(AppError::BadRequest)?;

    let owner = UserRepo::find_by_id(&state.pool, project.owner_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: project.owner_id,
        }))?;

    let milestones = MilestoneRepo::list_by_project(&state.pool, id)
        .await?
        .into_iter()
        .map(|m| -> AppResult<MilestoneExport> {
            Ok(MilestoneExport {
                status: m.status.parse::<MilestoneStatus>().map_err(AppError::InternalError)?,
                name: m.name,
                start_date: m.start_date,
                due_date: m.due_date,
                duration: m.duration,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let snapshot = ProjectExport {
        name: project.name,
        description: project.description,
        start_date: project.start_date,
        end_date: project.end_date,
        owner_username: owner.username,
        is_archived: project.is_archived,
        created_at: project.created_at,
        milestones,
    };

    let body = render(&snapshot, format)
        .map_err(|e| AppError::InternalError(format!("Export rendering failed: {e}")))?;
    let filename = attachment_filename(&snapshot.name, format);

    tracing::info!(project_id = id, format = format.extension(), bytes = body.len(), "Project exported");

    Ok((
        [
            (CONTENT_TYPE, format.content_type().to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}
