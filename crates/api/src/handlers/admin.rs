//! Admin-only endpoints: user listing, data diagnostics and an on-demand
//! milestone reminder sweep.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use timeline_core::diagnostics::DiagnosticReport;
use timeline_db::models::user::UserResponse;
use timeline_db::repositories::{DiagnosticRepo, UserRepo};
use timeline_events::{MilestoneDueSweep, SweepReport};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list_with_roles(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/admin/diagnostics
pub async fn diagnostics(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<DataResponse<DiagnosticReport>>> {
    let report = DiagnosticRepo::run(&state.pool).await?;
    tracing::info!(
        admin_id = admin.user_id,
        issues = report.issues.len(),
        "Diagnostics run"
    );
    Ok(Json(DataResponse { data: report }))
}

/// POST /api/v1/admin/milestones/check-due
///
/// Run the reminder sweep now instead of waiting for the next interval.
pub async fn check_due_milestones(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<SweepReport>>> {
    let sweep = MilestoneDueSweep::new(
        state.pool.clone(),
        Arc::clone(&state.event_bus),
        state.config.milestone_due_window_days,
    );
    let report = sweep.run_once(Utc::now().date_naive()).await?;
    Ok(Json(DataResponse { data: report }))
}
