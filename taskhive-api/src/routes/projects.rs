/// Project endpoints
///
/// Projects are created by a manager who holds exclusive mutation rights;
/// collaborators (manager + team) can read them. Deleting a project removes
/// its tasks and their notes at the store level.
///
/// # Endpoints
///
/// - `POST   /api/projects` - Create a project (requester becomes manager)
/// - `GET    /api/projects` - Projects where the requester collaborates
/// - `GET    /api/projects/:projectId` - Project detail with its tasks
/// - `PUT    /api/projects/:projectId` - Update (manager only)
/// - `DELETE /api/projects/:projectId` - Delete (manager only)
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use taskhive_shared::auth::authorization::{require_collaborator, require_manager};
use taskhive_shared::models::{Project, Task};

use crate::{app::AppState, error::ApiResult, middleware::CurrentUser};

use super::{message, resolve_project, MessageResponse};

/// Create/update project request
#[derive(Debug, Deserialize, Validate)]
pub struct ProjectRequest {
    /// Project name
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,

    /// Client the project is for
    #[validate(length(min = 1, message = "Client name cannot be empty"))]
    pub client_name: String,

    /// Free-form description
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: String,
}

/// Project detail: the project plus its tasks.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,

    /// The project's tasks, oldest first
    pub tasks: Vec<Task>,
}

/// Create a project with the requester as manager
pub async fn create_project(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<ProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate()?;

    let project = Project::new(
        req.name.trim(),
        req.client_name.trim(),
        req.description.trim(),
        current.id,
    );
    state.store.insert_project(&project).await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// List all projects where the requester is manager or on the team
pub async fn list_projects(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = state.store.projects_for_user(current.id).await?;
    Ok(Json(projects))
}

/// Project detail, including its tasks
///
/// # Errors
///
/// - `404 Not Found`: No such project
/// - `403 Forbidden`: Requester is not a collaborator
pub async fn get_project(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<ProjectDetail>> {
    let project = resolve_project(state.store.as_ref(), project_id).await?;
    require_collaborator(&project, current.id)?;

    let tasks = state.store.tasks_by_project(project.id).await?;
    Ok(Json(ProjectDetail { project, tasks }))
}

/// Update a project (manager only)
pub async fn update_project(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(project_id): Path<Uuid>,
    Json(req): Json<ProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate()?;

    let mut project = resolve_project(state.store.as_ref(), project_id).await?;
    require_manager(&project, current.id)?;

    project.name = req.name.trim().to_string();
    project.client_name = req.client_name.trim().to_string();
    project.description = req.description.trim().to_string();
    project.touch();
    state.store.save_project(&project).await?;

    Ok(Json(project))
}

/// Delete a project and everything under it (manager only)
pub async fn delete_project(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let project = resolve_project(state.store.as_ref(), project_id).await?;
    require_manager(&project, current.id)?;

    state.store.delete_project(project.id).await?;
    Ok(message("Project deleted"))
}
