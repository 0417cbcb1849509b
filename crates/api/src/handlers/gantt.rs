//! Gantt chart layout for a project.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use timeline_core::gantt::{build_chart, GanttChart, GanttInput};
use timeline_core::milestone::MilestoneStatus;
use timeline_core::types::DbId;

use crate::access::load_project;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/gantt
pub async fn project_chart(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<GanttChart>>> {
    let project = load_project(&state.pool, id, auth.user_id).await?.project;

    let inputs = super::milestone::with_dependencies(&state.pool, id)
        .await?
        .into_iter()
        .map(|entry| -> AppResult<GanttInput> {
            let m = entry.milestone;
            Ok(GanttInput {
                status: m.status.parse::<MilestoneStatus>().map_err(AppError::InternalError)?,
                id: m.id,
                name: m.name,
                start_date: m.start_date,
                due_date: m.due_date,
                duration: m.duration,
                dependency_ids: entry.dependency_ids,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let chart = build_chart(
        project.start_date,
        project.end_date,
        inputs,
        Utc::now().date_naive(),
    );
    Ok(Json(DataResponse { data: chart }))
}
