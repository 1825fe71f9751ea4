/// Note endpoints
///
/// Notes are short comments collaborators leave on tasks. They are
/// append-only; only the author may delete one.
///
/// # Endpoints
///
/// - `POST   /api/projects/:projectId/tasks/:taskId/notes` - Create
/// - `GET    /api/projects/:projectId/tasks/:taskId/notes` - List
/// - `DELETE /api/projects/:projectId/tasks/:taskId/notes/:noteId` - Delete
///   (author only)
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use taskhive_shared::auth::authorization::{require_note_author, require_note_in_task};
use taskhive_shared::models::Note;

use crate::{app::AppState, error::ApiResult, middleware::CurrentUser};

use super::{message, resolve_note, resolve_project_task, MessageResponse};

/// Create note request
#[derive(Debug, Deserialize, Validate)]
pub struct NoteRequest {
    /// Note body
    #[validate(length(min = 1, message = "Note content cannot be empty"))]
    pub content: String,
}

/// Leave a note on a task; the requester becomes its author
pub async fn create_note(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<NoteRequest>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    req.validate()?;

    let (_, task) =
        resolve_project_task(state.store.as_ref(), current.id, project_id, task_id).await?;

    let note = Note::new(task.id, current.id, req.content.trim());
    state.store.insert_note(&note).await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// List a task's notes, oldest first
pub async fn list_notes(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<Note>>> {
    let (_, task) =
        resolve_project_task(state.store.as_ref(), current.id, project_id, task_id).await?;

    let notes = state.store.notes_by_task(task.id).await?;
    Ok(Json(notes))
}

/// Delete a note (author only)
///
/// # Errors
///
/// - `404 Not Found`: No such project, task, or note
/// - `409 Conflict`: Note belongs to a different task
/// - `403 Forbidden`: Requester is not the note's author
pub async fn delete_note(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((project_id, task_id, note_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<Json<MessageResponse>> {
    let (_, task) =
        resolve_project_task(state.store.as_ref(), current.id, project_id, task_id).await?;

    let note = resolve_note(state.store.as_ref(), note_id).await?;
    require_note_in_task(&note, &task)?;
    require_note_author(&note, current.id)?;

    state.store.delete_note(note.id).await?;
    Ok(message("Note deleted"))
}
