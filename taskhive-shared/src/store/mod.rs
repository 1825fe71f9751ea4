//! Storage abstraction
//!
//! This module provides the [`Store`] trait that abstracts over persistence
//! backends. Two implementations ship with the crate:
//!
//! - [`MemStore`]: in-memory maps, the default when no database is
//!   configured and the backend every test runs against
//! - [`PgStore`]: PostgreSQL via sqlx
//!
//! Handlers hold the store as `Arc<dyn Store>` and never know which backend
//! they talk to. All writes are whole-document saves (last write wins);
//! there are no partial updates or cross-entity transactions.

pub mod memory;
pub mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Note, OneTimeToken, Project, Task, User};

/// Errors surfaced by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A save or delete targeted a document that does not exist
    #[error("document not found")]
    NotFound,

    /// An insert violated a uniqueness rule (duplicate user email)
    #[error("duplicate value for unique field: {0}")]
    Duplicate(String),

    /// The backend itself failed (connection, query, serialization)
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Duplicate(db.constraint().unwrap_or("unknown").to_string())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations the API needs, one backend-agnostic surface.
///
/// Lookups return `Ok(None)` for absent documents; `StoreError::NotFound` is
/// reserved for saves and deletes that target a missing document. Backends
/// must enforce email uniqueness on user inserts and cascade deletes from
/// projects to their tasks and from tasks to their notes.
#[async_trait]
pub trait Store: Send + Sync {
    // --- users ---

    async fn insert_user(&self, user: &User) -> StoreResult<()>;
    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Fetches many users at once; missing ids are silently skipped.
    async fn users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;
    async fn save_user(&self, user: &User) -> StoreResult<()>;

    // --- one-time tokens ---

    async fn insert_token(&self, token: &OneTimeToken) -> StoreResult<()>;
    async fn token_by_code(&self, code: &str) -> StoreResult<Option<OneTimeToken>>;
    async fn delete_token(&self, id: Uuid) -> StoreResult<()>;

    // --- projects ---

    async fn insert_project(&self, project: &Project) -> StoreResult<()>;
    async fn project_by_id(&self, id: Uuid) -> StoreResult<Option<Project>>;
    /// All projects where the user is manager or on the team.
    async fn projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>>;
    async fn save_project(&self, project: &Project) -> StoreResult<()>;
    /// Deletes the project and cascades to its tasks and their notes.
    async fn delete_project(&self, id: Uuid) -> StoreResult<()>;

    // --- tasks ---

    async fn insert_task(&self, task: &Task) -> StoreResult<()>;
    async fn task_by_id(&self, id: Uuid) -> StoreResult<Option<Task>>;
    /// All tasks in a project, oldest first.
    async fn tasks_by_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>>;
    async fn save_task(&self, task: &Task) -> StoreResult<()>;
    /// Deletes the task and cascades to its notes.
    async fn delete_task(&self, id: Uuid) -> StoreResult<()>;

    // --- notes ---

    async fn insert_note(&self, note: &Note) -> StoreResult<()>;
    async fn note_by_id(&self, id: Uuid) -> StoreResult<Option<Note>>;
    /// All notes on a task, oldest first.
    async fn notes_by_task(&self, task_id: Uuid) -> StoreResult<Vec<Note>>;
    async fn delete_note(&self, id: Uuid) -> StoreResult<()>;

    // --- liveness ---

    /// Cheap backend health probe for the `/health` endpoint.
    async fn ping(&self) -> StoreResult<()>;
}
