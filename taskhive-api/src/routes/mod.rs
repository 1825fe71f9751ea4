/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Account flows (registration, confirmation, login, password reset, profile)
/// - `projects`: Project CRUD
/// - `team`: Project team membership
/// - `tasks`: Tasks and status changes
/// - `notes`: Notes on tasks
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use taskhive_shared::models::{Note, Project, Task};
use taskhive_shared::store::Store;

use crate::error::{ApiError, ApiResult};

pub mod auth;
pub mod health;
pub mod notes;
pub mod projects;
pub mod tasks;
pub mod team;

/// Plain-message response body used by mutations that return no entity.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Shorthand for the `{"message": ...}` responses.
pub(crate) fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.to_string(),
    })
}

// Entity resolution shared by the project/task/note handlers. Guards are
// pure; these do the one store fetch each and map absence to 404.

pub(crate) async fn resolve_project(store: &dyn Store, project_id: Uuid) -> ApiResult<Project> {
    store
        .project_by_id(project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
}

pub(crate) async fn resolve_task(store: &dyn Store, task_id: Uuid) -> ApiResult<Task> {
    store
        .task_by_id(task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

pub(crate) async fn resolve_note(store: &dyn Store, note_id: Uuid) -> ApiResult<Note> {
    store
        .note_by_id(note_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))
}

/// The guard chain every task/note route starts with: the project exists,
/// the requester collaborates on it, the task exists, and the task really
/// lives under the project named in the path.
pub(crate) async fn resolve_project_task(
    store: &dyn Store,
    user_id: Uuid,
    project_id: Uuid,
    task_id: Uuid,
) -> ApiResult<(Project, Task)> {
    use taskhive_shared::auth::authorization::{require_collaborator, require_task_in_project};

    let project = resolve_project(store, project_id).await?;
    require_collaborator(&project, user_id)?;
    let task = resolve_task(store, task_id).await?;
    require_task_in_project(&task, &project)?;
    Ok((project, task))
}
