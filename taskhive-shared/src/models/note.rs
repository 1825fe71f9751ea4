/// Note model
///
/// Short comments collaborators leave on a task. Notes are immutable once
/// written; only the author may delete one.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A note on a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Unique note ID (UUID v4)
    pub id: Uuid,

    /// The task this note was left on
    pub task_id: Uuid,

    /// The collaborator who wrote the note
    pub author_id: Uuid,

    /// Note body
    pub content: String,

    /// When the note was written
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn new(task_id: Uuid, author_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            author_id,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}
