pub mod admin;
pub mod analytics;
pub mod auth;
pub mod health;
pub mod milestone;
pub mod notification;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register | /auth/login | /auth/refresh      public
/// /auth/logout                                       requires auth
///
/// /projects                                          dashboard, create
/// /projects/archived                                 archived listing
/// /projects/{id}                                     detail, update, delete
/// /projects/{id}/archive | /unarchive                toggle archive (POST)
/// /projects/{id}/share                               share by email (POST)
/// /projects/{id}/collaborators/{user_id}             remove collaborator
/// /projects/{id}/milestones                          list, create
/// /projects/{id}/export/{format}                     csv | pdf download
/// /projects/{id}/gantt                               chart layout
///
/// /milestones/{id}                                   get, update, delete
/// /milestones/{id}/status/{status}                   set status (POST)
///
/// /notifications                                     list
/// /notifications/unread-count                        unread count
/// /notifications/read-all                            mark all read (POST)
/// /notifications/{id}/read                           mark one read (POST)
///
/// /analytics                                         portfolio summary
///
/// /admin/users                                       list users (admin only)
/// /admin/diagnostics                                 integrity report
/// /admin/milestones/check-due                        run reminder sweep (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", project::router())
        .nest("/milestones", milestone::router())
        .nest("/notifications", notification::router())
        .nest("/analytics", analytics::router())
        .nest("/admin", admin::router())
}
