//! Handlers for milestones, nested under projects for listing and creation
//! and addressed directly by id otherwise.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use timeline_core::dependency::validate_dependencies;
use timeline_core::error::CoreError;
use timeline_core::milestone::{resolve_schedule, MilestoneStatus};
use timeline_core::notification::{milestone_added_message, NotificationType};
use timeline_core::project::validate_name;
use timeline_core::types::DbId;
use timeline_db::models::milestone::{
    CreateMilestone, Milestone, MilestoneValues, MilestoneWithDependencies, UpdateMilestone,
};
use timeline_db::models::notification::CreateNotification;
use timeline_db::models::project::Project;
use timeline_db::repositories::{CollaboratorRepo, MilestoneRepo, NotificationRepo};
use timeline_db::DbPool;
use timeline_events::bus::EVENT_MILESTONE_ADDED;
use timeline_events::TimelineEvent;

use crate::access::{load_owned_project, load_project, ProjectContext};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A project's milestones in schedule order, each with its dependency ids.
pub(crate) async fn with_dependencies(
    pool: &DbPool,
    project_id: DbId,
) -> AppResult<Vec<MilestoneWithDependencies>> {
    let milestones = MilestoneRepo::list_by_project(pool, project_id).await?;
    let mut deps = MilestoneRepo::dependency_map(pool, project_id).await?;

    Ok(milestones
        .into_iter()
        .map(|milestone| MilestoneWithDependencies {
            dependency_ids: deps.remove(&milestone.id).unwrap_or_default(),
            milestone,
        })
        .collect())
}

fn parse_status(status: Option<&str>) -> AppResult<MilestoneStatus> {
    match status {
        None => Ok(MilestoneStatus::default()),
        Some(s) => s.parse::<MilestoneStatus>().map_err(AppError::validation),
    }
}

/// Check a requested dependency set against the project graph.
async fn checked_dependencies(
    pool: &DbPool,
    project_id: DbId,
    milestone_id: Option<DbId>,
    requested: &[DbId],
) -> AppResult<Vec<DbId>> {
    if requested.is_empty() {
        return Ok(Vec::new());
    }
    let ids: HashSet<DbId> = MilestoneRepo::ids_for_project(pool, project_id)
        .await?
        .into_iter()
        .collect();
    let edges = MilestoneRepo::project_edges(pool, project_id).await?;
    validate_dependencies(milestone_id, requested, &ids, &edges).map_err(AppError::validation)
}

/// Load a milestone and the caller's context on its project.
async fn load_milestone(
    pool: &DbPool,
    id: DbId,
    user_id: DbId,
) -> AppResult<(Milestone, ProjectContext)> {
    let milestone = MilestoneRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id,
        }))?;
    let ctx = load_project(pool, milestone.project_id, user_id).await?;
    Ok((milestone, ctx))
}

async fn load_owned_milestone(
    pool: &DbPool,
    id: DbId,
    user_id: DbId,
) -> AppResult<(Milestone, Project)> {
    let (milestone, ctx) = load_milestone(pool, id, user_id).await?;
    Ok((milestone, ctx.require_owner()?))
}

/// Tell every collaborator about a new milestone.
async fn notify_milestone_added(
    state: &AppState,
    project: &Project,
    milestone: &Milestone,
    actor_id: DbId,
) -> AppResult<()> {
    let message = milestone_added_message(&milestone.name, &project.name);

    for user_id in CollaboratorRepo::user_ids(&state.pool, project.id).await? {
        NotificationRepo::create(
            &state.pool,
            &CreateNotification {
                user_id,
                notification_type: NotificationType::MilestoneAdded,
                project_id: Some(project.id),
                milestone_id: Some(milestone.id),
                message: message.clone(),
            },
        )
        .await?;

        state.event_bus.publish(
            TimelineEvent::new(EVENT_MILESTONE_ADDED, message.clone())
                .with_project(project.id)
                .with_milestone(milestone.id)
                .with_actor(actor_id)
                .with_recipient(user_id),
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/milestones
pub async fn list_by_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MilestoneWithDependencies>>>> {
    load_project(&state.pool, project_id, auth.user_id).await?;
    let milestones = with_dependencies(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: milestones }))
}

/// POST /api/v1/projects/{id}/milestones
///
/// Without a start date the milestone is a single day on its due date.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateMilestone>,
) -> AppResult<(StatusCode, Json<DataResponse<MilestoneWithDependencies>>)> {
    let project = load_owned_project(&state.pool, project_id, auth.user_id).await?;

    let name = validate_name(&input.name).map_err(AppError::validation)?;
    let schedule = resolve_schedule(
        input.start_date,
        input.due_date,
        project.start_date,
        project.end_date,
    )
    .map_err(AppError::validation)?;
    let status = parse_status(input.status.as_deref())?;

    let dependency_ids = checked_dependencies(
        &state.pool,
        project_id,
        None,
        input.dependency_ids.as_deref().unwrap_or_default(),
    )
    .await?;

    let values = MilestoneValues {
        name,
        description: input.description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
        start_date: schedule.start_date,
        due_date: schedule.due_date,
        duration: schedule.duration,
        status: status.as_str().to_string(),
    };
    let milestone = MilestoneRepo::create(&state.pool, project_id, &values, &dependency_ids).await?;

    tracing::info!(milestone_id = milestone.id, project_id, "Milestone created");
    notify_milestone_added(&state, &project, &milestone, auth.user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: MilestoneWithDependencies {
                milestone,
                dependency_ids,
            },
        }),
    ))
}

/// GET /api/v1/milestones/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MilestoneWithDependencies>>> {
    let (milestone, _) = load_milestone(&state.pool, id, auth.user_id).await?;
    let dependency_ids = MilestoneRepo::dependency_ids(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: MilestoneWithDependencies {
            milestone,
            dependency_ids,
        },
    }))
}

/// PUT /api/v1/milestones/{id}
///
/// Fields left out keep their current value. `dependency_ids`, when given,
/// replaces the whole set.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMilestone>,
) -> AppResult<Json<DataResponse<MilestoneWithDependencies>>> {
    let (current, project) = load_owned_milestone(&state.pool, id, auth.user_id).await?;

    let name = match input.name.as_deref() {
        Some(n) => validate_name(n).map_err(AppError::validation)?,
        None => current.name.clone(),
    };
    let schedule = resolve_schedule(
        Some(input.start_date.unwrap_or(current.start_date)),
        input.due_date.unwrap_or(current.due_date),
        project.start_date,
        project.end_date,
    )
    .map_err(AppError::validation)?;
    let status = match input.status.as_deref() {
        Some(s) => parse_status(Some(s))?,
        None => parse_status(Some(&current.status))?,
    };

    let requested = match &input.dependency_ids {
        Some(ids) => Some(checked_dependencies(&state.pool, project.id, Some(id), ids).await?),
        None => None,
    };

    let values = MilestoneValues {
        name,
        description: match input.description {
            Some(d) => Some(d.trim().to_string()).filter(|d| !d.is_empty()),
            None => current.description,
        },
        start_date: schedule.start_date,
        due_date: schedule.due_date,
        duration: schedule.duration,
        status: status.as_str().to_string(),
    };

    let milestone = MilestoneRepo::update(&state.pool, id, &values, requested.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id,
        }))?;
    let dependency_ids = match requested {
        Some(ids) => ids,
        None => MilestoneRepo::dependency_ids(&state.pool, id).await?,
    };

    Ok(Json(DataResponse {
        data: MilestoneWithDependencies {
            milestone,
            dependency_ids,
        },
    }))
}

/// POST /api/v1/milestones/{id}/status/{status}
pub async fn set_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, status)): Path<(DbId, String)>,
) -> AppResult<Json<DataResponse<Milestone>>> {
    let status = status.parse::<MilestoneStatus>().map_err(AppError::BadRequest)?;
    load_owned_milestone(&state.pool, id, auth.user_id).await?;

    let milestone = MilestoneRepo::set_status(&state.pool, id, status.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id,
        }))?;

    tracing::info!(milestone_id = id, status = %status, "Milestone status changed");
    Ok(Json(DataResponse { data: milestone }))
}

/// DELETE /api/v1/milestones/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned_milestone(&state.pool, id, auth.user_id).await?;

    if MilestoneRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id,
        }))
    }
}
