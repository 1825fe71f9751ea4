/// Task endpoints
///
/// Task lifecycle (create/update/delete) is manager-only; reading tasks and
/// moving them between statuses is open to every collaborator. Each status
/// change is recorded in the task's history together with the collaborator
/// who made it, in the same document write as the status itself.
///
/// # Endpoints
///
/// - `POST   /api/projects/:projectId/tasks` - Create (manager only)
/// - `GET    /api/projects/:projectId/tasks` - List
/// - `GET    /api/projects/:projectId/tasks/:taskId` - Detail with populated
///   history attributors and notes
/// - `PUT    /api/projects/:projectId/tasks/:taskId` - Update (manager only)
/// - `DELETE /api/projects/:projectId/tasks/:taskId` - Delete (manager only)
/// - `POST   /api/projects/:projectId/tasks/:taskId/status` - Change status
use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use taskhive_shared::auth::authorization::{require_collaborator, require_manager};
use taskhive_shared::models::{Task, TaskStatus, UserProfile};

use crate::{app::AppState, error::ApiResult, middleware::CurrentUser};

use super::{message, resolve_project, resolve_project_task, MessageResponse};

/// Create/update task request
#[derive(Debug, Deserialize, Validate)]
pub struct TaskRequest {
    /// Task name
    #[validate(length(min = 1, message = "Task name cannot be empty"))]
    pub name: String,

    /// Free-form description
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: String,
}

/// Status change request
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// The status to move the task to
    pub status: TaskStatus,
}

/// One history entry with its attributor resolved to a profile.
///
/// `user` is `None` when the attributing account no longer resolves.
#[derive(Debug, Serialize)]
pub struct StatusChangeView {
    pub user: Option<UserProfile>,
    pub status: TaskStatus,
    pub changed_at: DateTime<Utc>,
}

/// One note with its author resolved to a profile.
#[derive(Debug, Serialize)]
pub struct NoteView {
    pub id: Uuid,
    pub content: String,
    pub author: Option<UserProfile>,
    pub created_at: DateTime<Utc>,
}

/// Task detail: the task with populated history and notes.
#[derive(Debug, Serialize)]
pub struct TaskDetail {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub status_history: Vec<StatusChangeView>,
    pub notes: Vec<NoteView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create a task in a project (manager only)
pub async fn create_task(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(project_id): Path<Uuid>,
    Json(req): Json<TaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let project = resolve_project(state.store.as_ref(), project_id).await?;
    require_manager(&project, current.id)?;

    let task = Task::new(project.id, req.name.trim(), req.description.trim());
    state.store.insert_task(&task).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// List a project's tasks, oldest first
pub async fn list_tasks(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    let project = resolve_project(state.store.as_ref(), project_id).await?;
    require_collaborator(&project, current.id)?;

    let tasks = state.store.tasks_by_project(project.id).await?;
    Ok(Json(tasks))
}

/// Task detail with history attributors and note authors populated
///
/// # Errors
///
/// - `404 Not Found`: No such project or task
/// - `403 Forbidden`: Requester is not a collaborator
/// - `409 Conflict`: Task belongs to a different project
pub async fn get_task(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<TaskDetail>> {
    let (_, task) =
        resolve_project_task(state.store.as_ref(), current.id, project_id, task_id).await?;

    let notes = state.store.notes_by_task(task.id).await?;

    // One batched lookup covers history attributors and note authors.
    let mut user_ids: Vec<Uuid> = task
        .status_history
        .iter()
        .map(|change| change.user_id)
        .chain(notes.iter().map(|note| note.author_id))
        .collect();
    user_ids.sort_unstable();
    user_ids.dedup();

    let profiles: HashMap<Uuid, UserProfile> = state
        .store
        .users_by_ids(&user_ids)
        .await?
        .iter()
        .map(|user| (user.id, UserProfile::from(user)))
        .collect();

    let status_history = task
        .status_history
        .iter()
        .map(|change| StatusChangeView {
            user: profiles.get(&change.user_id).cloned(),
            status: change.status,
            changed_at: change.changed_at,
        })
        .collect();

    let notes = notes
        .into_iter()
        .map(|note| NoteView {
            id: note.id,
            content: note.content,
            author: profiles.get(&note.author_id).cloned(),
            created_at: note.created_at,
        })
        .collect();

    Ok(Json(TaskDetail {
        id: task.id,
        project_id: task.project_id,
        name: task.name,
        description: task.description,
        status: task.status,
        status_history,
        notes,
        created_at: task.created_at,
        updated_at: task.updated_at,
    }))
}

/// Update a task's name and description (manager only)
pub async fn update_task(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<TaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let (project, mut task) =
        resolve_project_task(state.store.as_ref(), current.id, project_id, task_id).await?;
    require_manager(&project, current.id)?;

    task.name = req.name.trim().to_string();
    task.description = req.description.trim().to_string();
    task.touch();
    state.store.save_task(&task).await?;

    Ok(Json(task))
}

/// Delete a task and its notes (manager only)
pub async fn delete_task(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<MessageResponse>> {
    let (project, task) =
        resolve_project_task(state.store.as_ref(), current.id, project_id, task_id).await?;
    require_manager(&project, current.id)?;

    state.store.delete_task(task.id).await?;
    Ok(message("Task deleted"))
}

/// Move a task to a new status (any collaborator)
///
/// Statuses are unconstrained (any may follow any), but every change is
/// attributed: the history entry lands in the same save as the status field.
pub async fn update_task_status(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<Json<Task>> {
    let (_, mut task) =
        resolve_project_task(state.store.as_ref(), current.id, project_id, task_id).await?;

    task.set_status(req.status, current.id);
    state.store.save_task(&task).await?;

    Ok(Json(task))
}
