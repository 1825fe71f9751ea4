/// Task model
///
/// Tasks belong to exactly one project and move freely between five workflow
/// statuses. Every status change is appended to the task's history together
/// with the user who made it, so a task carries its own audit trail.
///
/// # Statuses
///
/// ```text
/// pending | on_hold | in_progress | under_review | completed
/// ```
///
/// Any status may follow any other; the board is a workflow aid, not a state
/// machine.
///
/// # Example
///
/// ```
/// use taskhive_shared::models::task::{Task, TaskStatus};
/// use uuid::Uuid;
///
/// let project_id = Uuid::new_v4();
/// let reviewer = Uuid::new_v4();
///
/// let mut task = Task::new(project_id, "Ship login page", "With OAuth buttons");
/// assert_eq!(task.status, TaskStatus::Pending);
///
/// task.set_status(TaskStatus::UnderReview, reviewer);
/// assert_eq!(task.status_history.len(), 1);
/// assert_eq!(task.status_history[0].user_id, reviewer);
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet; the status every new task begins in
    Pending,

    /// Parked, waiting on something outside the team
    OnHold,

    /// Actively being worked on
    InProgress,

    /// Done, awaiting review
    UnderReview,

    /// Finished
    Completed,
}

impl TaskStatus {
    /// All statuses in board order.
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Pending,
        TaskStatus::OnHold,
        TaskStatus::InProgress,
        TaskStatus::UnderReview,
        TaskStatus::Completed,
    ];

    /// Converts the status to its wire/storage label.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::OnHold => "on_hold",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::UnderReview => "under_review",
            TaskStatus::Completed => "completed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "on_hold" => Ok(TaskStatus::OnHold),
            "in_progress" => Ok(TaskStatus::InProgress),
            "under_review" => Ok(TaskStatus::UnderReview),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

/// One entry in a task's status audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    /// The collaborator who made the change
    pub user_id: Uuid,

    /// The status the task was moved to
    pub status: TaskStatus,

    /// When the change happened
    pub changed_at: DateTime<Utc>,
}

/// A task within a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// The project this task belongs to
    pub project_id: Uuid,

    /// Task name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Current workflow status
    pub status: TaskStatus,

    /// Append-only record of every status change, oldest first
    pub status_history: Vec<StatusChange>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in `pending` with an empty history.
    pub fn new(project_id: Uuid, name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            name: name.into(),
            description: description.into(),
            status: TaskStatus::Pending,
            status_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the task to `status` and records who did it.
    ///
    /// The history entry and the status field change together, so a saved
    /// task is always internally consistent.
    pub fn set_status(&mut self, status: TaskStatus, user_id: Uuid) {
        let now = Utc::now();
        self.status = status;
        self.status_history.push(StatusChange {
            user_id,
            status,
            changed_at: now,
        });
        self.updated_at = now;
    }

    /// Bumps the `updated_at` timestamp. Call before saving a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_labels() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&TaskStatus::UnderReview).unwrap();
        assert_eq!(json, "\"under_review\"");

        let parsed: TaskStatus = serde_json::from_str("\"on_hold\"").unwrap();
        assert_eq!(parsed, TaskStatus::OnHold);
    }

    #[test]
    fn test_unknown_status_label_is_rejected() {
        assert!("archived".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_new_task_is_pending_with_empty_history() {
        let task = Task::new(Uuid::new_v4(), "T", "D");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.status_history.is_empty());
    }

    #[test]
    fn test_set_status_appends_history_in_order() {
        let mut task = Task::new(Uuid::new_v4(), "T", "D");
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        task.set_status(TaskStatus::InProgress, alice);
        task.set_status(TaskStatus::Completed, bob);

        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.status_history.len(), 2);
        assert_eq!(task.status_history[0].user_id, alice);
        assert_eq!(task.status_history[0].status, TaskStatus::InProgress);
        assert_eq!(task.status_history[1].user_id, bob);
        assert_eq!(task.status_history[1].status, TaskStatus::Completed);
    }
}
