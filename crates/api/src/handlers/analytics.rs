//! Portfolio summary across every project the caller can see.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use timeline_core::analytics::{summarize, AnalyticsSummary, MilestoneFact, ProjectFact};
use timeline_core::milestone::MilestoneStatus;
use timeline_db::repositories::AnalyticsRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/analytics
pub async fn summary(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> AppResult<Json<DataResponse<AnalyticsSummary>>> {
    let projects: Vec<ProjectFact> = AnalyticsRepo::project_facts(&state.pool, auth.user_id)
        .await?
        .into_iter()
        .map(|row| ProjectFact {
            project_id: row.id,
            name: row.name,
            is_archived: row.is_archived,
        })
        .collect();

    let milestones = AnalyticsRepo::milestone_facts(&state.pool, auth.user_id)
        .await?
        .into_iter()
        .map(|row| -> AppResult<MilestoneFact> {
            Ok(MilestoneFact {
                project_id: row.project_id,
                status: row.status.parse::<MilestoneStatus>().map_err(AppError::InternalError)?,
                due_date: row.due_date,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let summary = summarize(&projects, &milestones, Utc::now().date_naive());
    Ok(Json(DataResponse { data: summary }))
}
