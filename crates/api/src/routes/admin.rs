//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the `admin` role.
///
/// ```text
/// GET  /users                   -> list_users
/// GET  /diagnostics             -> diagnostics
/// POST /milestones/check-due    -> check_due_milestones
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/diagnostics", get(admin::diagnostics))
        .route("/milestones/check-due", post(admin::check_due_milestones))
}
