/// Team membership endpoints
///
/// The team is the set of non-owning collaborators on a project. Membership
/// is managed by the manager; the manager is never a member ("manager" and
/// "team member" are disjoint roles on one project).
///
/// # Endpoints
///
/// - `POST   /api/projects/:projectId/team/find` - Look up a user by email
/// - `GET    /api/projects/:projectId/team` - List members (profiles)
/// - `POST   /api/projects/:projectId/team` - Add a member (manager only)
/// - `DELETE /api/projects/:projectId/team/:userId` - Remove a member (manager only)
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use taskhive_shared::auth::authorization::{require_collaborator, require_manager};
use taskhive_shared::models::{User, UserProfile};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::CurrentUser,
};

use super::{message, resolve_project, MessageResponse};

/// Find member request
#[derive(Debug, Deserialize, Validate)]
pub struct FindMemberRequest {
    /// Email to look up
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Add member request; the id usually comes from a prior find-by-email
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// The user to add
    pub id: Uuid,
}

/// Look up a user by email, for the add-member flow
///
/// # Errors
///
/// - `404 Not Found`: Project or user not found
/// - `403 Forbidden`: Requester is not a collaborator
pub async fn find_member_by_email(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(project_id): Path<Uuid>,
    Json(req): Json<FindMemberRequest>,
) -> ApiResult<Json<UserProfile>> {
    req.validate()?;

    let project = resolve_project(state.store.as_ref(), project_id).await?;
    require_collaborator(&project, current.id)?;

    let email = User::normalize_email(&req.email);
    let user = state
        .store
        .user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No account with that email".to_string()))?;

    Ok(Json(UserProfile::from(user)))
}

/// List the project's team as profile projections
pub async fn get_project_team(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<UserProfile>>> {
    let project = resolve_project(state.store.as_ref(), project_id).await?;
    require_collaborator(&project, current.id)?;

    let members = state.store.users_by_ids(&project.team).await?;
    Ok(Json(members.iter().map(UserProfile::from).collect()))
}

/// Add a user to the team (manager only)
///
/// # Errors
///
/// - `404 Not Found`: Project or user not found
/// - `403 Forbidden`: Requester is not the manager
/// - `409 Conflict`: User is already on the team, or is the manager
pub async fn add_team_member(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(project_id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let mut project = resolve_project(state.store.as_ref(), project_id).await?;
    require_manager(&project, current.id)?;

    let user = state
        .store
        .user_by_id(req.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if project.is_manager(user.id) {
        return Err(ApiError::Conflict(
            "The manager cannot be added to the team".to_string(),
        ));
    }
    if project.team.contains(&user.id) {
        return Err(ApiError::Conflict(
            "User is already on the team".to_string(),
        ));
    }

    project.team.push(user.id);
    project.touch();
    state.store.save_project(&project).await?;

    Ok(message("Member added to the team"))
}

/// Remove a user from the team (manager only)
///
/// # Errors
///
/// - `404 Not Found`: Project not found
/// - `403 Forbidden`: Requester is not the manager
/// - `409 Conflict`: User is not on the team
pub async fn remove_team_member(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((project_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<MessageResponse>> {
    let mut project = resolve_project(state.store.as_ref(), project_id).await?;
    require_manager(&project, current.id)?;

    if !project.team.contains(&user_id) {
        return Err(ApiError::Conflict("User is not on the team".to_string()));
    }

    project.team.retain(|id| *id != user_id);
    project.touch();
    state.store.save_project(&project).await?;

    Ok(message("Member removed from the team"))
}
