/// Project model
///
/// A project is owned by exactly one manager and shared with a team of
/// collaborators. The manager is never a member of the team set; managers
/// and team members together are the project's collaborators.
///
/// # Example
///
/// ```
/// use taskhive_shared::models::project::Project;
/// use uuid::Uuid;
///
/// let manager = Uuid::new_v4();
/// let teammate = Uuid::new_v4();
///
/// let mut project = Project::new("Website relaunch", "ACME", "Q3 marketing site", manager);
/// project.team.push(teammate);
///
/// assert!(project.is_manager(manager));
/// assert!(project.is_collaborator(teammate));
/// assert!(!project.is_manager(teammate));
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A project with its manager and team membership set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique project ID (UUID v4)
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Client the project is for
    pub client_name: String,

    /// Free-form description
    pub description: String,

    /// The user who created the project and controls its lifecycle
    pub manager_id: Uuid,

    /// Team members invited by the manager; never contains the manager
    pub team: Vec<Uuid>,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project with an empty team.
    pub fn new(
        name: impl Into<String>,
        client_name: impl Into<String>,
        description: impl Into<String>,
        manager_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            client_name: client_name.into(),
            description: description.into(),
            manager_id,
            team: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user_id` is the project's manager.
    pub fn is_manager(&self, user_id: Uuid) -> bool {
        self.manager_id == user_id
    }

    /// Whether `user_id` may see the project: the manager or any team member.
    pub fn is_collaborator(&self, user_id: Uuid) -> bool {
        self.is_manager(user_id) || self.team.contains(&user_id)
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
    fn test_manager_is_collaborator_but_not_team_member() {
        let manager = Uuid::new_v4();
        let project = Project::new("P", "C", "D", manager);

        assert!(project.is_manager(manager));
        assert!(project.is_collaborator(manager));
        assert!(project.team.is_empty());
    }

    #[test]
    fn test_team_member_is_collaborator() {
        let manager = Uuid::new_v4();
        let member = Uuid::new_v4();
        let outsider = Uuid::new_v4();

        let mut project = Project::new("P", "C", "D", manager);
        project.team.push(member);

        assert!(project.is_collaborator(member));
        assert!(!project.is_manager(member));
        assert!(!project.is_collaborator(outsider));
    }
}
