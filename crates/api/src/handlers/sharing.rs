//! Sharing a project with other users and revoking access.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use timeline_core::error::CoreError;
use timeline_core::notification::{project_shared_message, NotificationType};
use timeline_core::types::DbId;
use timeline_core::user::normalize_email;
use timeline_db::models::notification::CreateNotification;
use timeline_db::models::project::{Collaborator, ShareProject};
use timeline_db::repositories::{CollaboratorRepo, NotificationRepo, UserRepo};
use timeline_events::bus::EVENT_PROJECT_SHARED;
use timeline_events::TimelineEvent;

use crate::access::load_owned_project;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects/{id}/share
///
/// Grant view access to the user registered under `email`. The new
/// collaborator receives one `project_shared` notification.
pub async fn share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<ShareProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Collaborator>>)> {
    let project = load_owned_project(&state.pool, project_id, auth.user_id).await?;

    let email = normalize_email(&input.email);
    if email.is_empty() {
        return Err(AppError::validation("Email is required"));
    }

    let recipient = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No user found with email '{email}'")))?;

    if recipient.id == project.owner_id {
        return Err(AppError::validation(
            "You cannot share a project with yourself",
        ));
    }
    if CollaboratorRepo::is_collaborator(&state.pool, project_id, recipient.id).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "{} already has access to this project",
            recipient.username
        ))));
    }

    CollaboratorRepo::add(&state.pool, project_id, recipient.id).await?;

    let owner = UserRepo::find_by_id(&state.pool, project.owner_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: project.owner_id,
        }))?;
    let message = project_shared_message(&owner.username, &project.name);

    NotificationRepo::create(
        &state.pool,
        &CreateNotification {
            user_id: recipient.id,
            notification_type: NotificationType::ProjectShared,
            project_id: Some(project_id),
            milestone_id: None,
            message: message.clone(),
        },
    )
    .await?;

    state.event_bus.publish(
        TimelineEvent::new(EVENT_PROJECT_SHARED, message)
            .with_project(project_id)
            .with_actor(auth.user_id)
            .with_recipient(recipient.id)
            .with_payload(serde_json::json!({
                "project_name": project.name,
                "owner_username": owner.username,
            })),
    );

    tracing::info!(project_id, collaborator_id = recipient.id, "Project shared");

    let collaborator = CollaboratorRepo::list_for_project(&state.pool, project_id)
        .await?
        .into_iter()
        .find(|c| c.user_id == recipient.id)
        .ok_or_else(|| AppError::InternalError("Collaborator row missing after insert".into()))?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: collaborator })))
}

/// DELETE /api/v1/projects/{id}/collaborators/{user_id}
pub async fn remove_collaborator(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    load_owned_project(&state.pool, project_id, auth.user_id).await?;

    if !CollaboratorRepo::remove(&state.pool, project_id, user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Collaborator",
            id: user_id,
        }));
    }

    tracing::info!(project_id, collaborator_id = user_id, "Collaborator removed");
    Ok(StatusCode::NO_CONTENT)
}
