//! Route definitions for the `/projects` resource and its sub-resources.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{export, gantt, milestone, project, sharing};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                               -> list_dashboard
/// POST   /                               -> create
/// GET    /archived                       -> list_archived
/// GET    /{id}                           -> get_by_id
/// PUT    /{id}                           -> update
/// DELETE /{id}                           -> delete
/// POST   /{id}/archive                   -> archive
/// POST   /{id}/unarchive                 -> unarchive
/// POST   /{id}/share                     -> share
/// DELETE /{id}/collaborators/{user_id}   -> remove_collaborator
/// GET    /{id}/milestones                -> milestone::list_by_project
/// POST   /{id}/milestones                -> milestone::create
/// GET    /{id}/export/{format}           -> export_project
/// GET    /{id}/gantt                     -> project_chart
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list_dashboard).post(project::create))
        .route("/archived", get(project::list_archived))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/archive", post(project::archive))
        .route("/{id}/unarchive", post(project::unarchive))
        .route("/{id}/share", post(sharing::share))
        .route(
            "/{id}/collaborators/{user_id}",
            delete(sharing::remove_collaborator),
        )
        .route(
            "/{id}/milestones",
            get(milestone::list_by_project).post(milestone::create),
        )
        .route("/{id}/export/{format}", get(export::export_project))
        .route("/{id}/gantt", get(gantt::project_chart))
}
