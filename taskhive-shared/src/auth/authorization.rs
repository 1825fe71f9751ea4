/// Authorization guards
///
/// Taskhive has no roles: authorization is manager-vs-collaborator per
/// project, plus note authorship. Handlers resolve entities from the store
/// first and then run these pure checks, so every guard is synchronous and
/// trivially testable.
///
/// Containment guards (`require_task_in_project`, `require_note_in_task`)
/// reject URLs whose nesting lies about where an entity lives: the task/note
/// exists, just not under the parent named in the path.
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::authorization::{require_collaborator, require_manager};
/// use taskhive_shared::models::Project;
/// use uuid::Uuid;
///
/// let manager = Uuid::new_v4();
/// let member = Uuid::new_v4();
/// let mut project = Project::new("P", "C", "D", manager);
/// project.team.push(member);
///
/// assert!(require_collaborator(&project, member).is_ok());
/// assert!(require_manager(&project, member).is_err());
/// ```
use uuid::Uuid;

use crate::models::{Note, Project, Task};

/// Error type for authorization and containment checks
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GuardError {
    /// Action is reserved for the project manager
    #[error("only the project manager can perform this action")]
    NotManager,

    /// User is neither the manager nor on the team
    #[error("not a collaborator on this project")]
    NotCollaborator,

    /// Only the note's author may act on it
    #[error("only the note author can perform this action")]
    NotNoteAuthor,

    /// The task exists but under a different project than the URL claims
    #[error("task does not belong to this project")]
    TaskNotInProject,

    /// The note exists but under a different task than the URL claims
    #[error("note does not belong to this task")]
    NoteNotInTask,
}

/// Requires that `user_id` is the project's manager.
///
/// Managers control the project lifecycle: updating and deleting the
/// project, creating/updating/deleting tasks, and changing the team.
pub fn require_manager(project: &Project, user_id: Uuid) -> Result<(), GuardError> {
    if !project.is_manager(user_id) {
        return Err(GuardError::NotManager);
    }
    Ok(())
}

/// Requires that `user_id` may see the project: the manager or a team member.
pub fn require_collaborator(project: &Project, user_id: Uuid) -> Result<(), GuardError> {
    if !project.is_collaborator(user_id) {
        return Err(GuardError::NotCollaborator);
    }
    Ok(())
}

/// Requires that the task really lives under the given project.
pub fn require_task_in_project(task: &Task, project: &Project) -> Result<(), GuardError> {
    if task.project_id != project.id {
        return Err(GuardError::TaskNotInProject);
    }
    Ok(())
}

/// Requires that the note really lives under the given task.
pub fn require_note_in_task(note: &Note, task: &Task) -> Result<(), GuardError> {
    if note.task_id != task.id {
        return Err(GuardError::NoteNotInTask);
    }
    Ok(())
}

/// Requires that `user_id` wrote the note.
pub fn require_note_author(note: &Note, user_id: Uuid) -> Result<(), GuardError> {
    if note.author_id != user_id {
        return Err(GuardError::NotNoteAuthor);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_manager() {
        let manager = Uuid::new_v4();
        let member = Uuid::new_v4();
        let mut project = Project::new("P", "C", "D", manager);
        project.team.push(member);

        assert!(require_manager(&project, manager).is_ok());
        assert_eq!(
            require_manager(&project, member),
            Err(GuardError::NotManager)
        );
    }

    #[test]
    fn test_require_collaborator() {
        let manager = Uuid::new_v4();
        let member = Uuid::new_v4();
        let outsider = Uuid::new_v4();
        let mut project = Project::new("P", "C", "D", manager);
        project.team.push(member);

        assert!(require_collaborator(&project, manager).is_ok());
        assert!(require_collaborator(&project, member).is_ok());
        assert_eq!(
            require_collaborator(&project, outsider),
            Err(GuardError::NotCollaborator)
        );
    }

    #[test]
    fn test_require_task_in_project() {
        let project = Project::new("P", "C", "D", Uuid::new_v4());
        let other_project = Project::new("Q", "C", "D", Uuid::new_v4());
        let task = Task::new(project.id, "T", "D");

        assert!(require_task_in_project(&task, &project).is_ok());
        assert_eq!(
            require_task_in_project(&task, &other_project),
            Err(GuardError::TaskNotInProject)
        );
    }

    #[test]
    fn test_require_note_in_task() {
        let task = Task::new(Uuid::new_v4(), "T", "D");
        let other_task = Task::new(Uuid::new_v4(), "U", "D");
        let note = Note::new(task.id, Uuid::new_v4(), "hi");

        assert!(require_note_in_task(&note, &task).is_ok());
        assert_eq!(
            require_note_in_task(&note, &other_task),
            Err(GuardError::NoteNotInTask)
        );
    }

    #[test]
    fn test_require_note_author() {
        let author = Uuid::new_v4();
        let note = Note::new(Uuid::new_v4(), author, "hi");

        assert!(require_note_author(&note, author).is_ok());
        assert_eq!(
            require_note_author(&note, Uuid::new_v4()),
            Err(GuardError::NotNoteAuthor)
        );
    }
}
