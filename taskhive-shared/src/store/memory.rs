/// In-memory storage backend
///
/// The default backend when no `DATABASE_URL` is configured, and the one the
/// test suite runs against. Documents live in plain maps behind a single
/// async `RwLock`; everything is lost on restart.
///
/// `MemStore` mirrors the SQL schema's rules: user emails are unique,
/// deleting a project removes its tasks and their notes, and deleting a
/// task removes its notes.
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{Note, OneTimeToken, Project, Task, User};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    tokens: HashMap<Uuid, OneTimeToken>,
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
    notes: HashMap<Uuid, Note>,
}

/// Map-backed [`Store`] implementation.
#[derive(Default)]
pub struct MemStore {
    inner: RwLock<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("users.email".to_string()));
        }
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.users.get(id).cloned())
            .collect())
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&user.id) {
            return Err(StoreError::NotFound);
        }
        if inner
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(StoreError::Duplicate("users.email".to_string()));
        }
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn insert_token(&self, token: &OneTimeToken) -> StoreResult<()> {
        self.inner
            .write()
            .await
            .tokens
            .insert(token.id, token.clone());
        Ok(())
    }

    async fn token_by_code(&self, code: &str) -> StoreResult<Option<OneTimeToken>> {
        let inner = self.inner.read().await;
        Ok(inner.tokens.values().find(|t| t.code == code).cloned())
    }

    async fn delete_token(&self, id: Uuid) -> StoreResult<()> {
        match self.inner.write().await.tokens.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    async fn insert_project(&self, project: &Project) -> StoreResult<()> {
        self.inner
            .write()
            .await
            .projects
            .insert(project.id, project.clone());
        Ok(())
    }

    async fn project_by_id(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self.inner.read().await.projects.get(&id).cloned())
    }

    async fn projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>> {
        let inner = self.inner.read().await;
        let mut projects: Vec<Project> = inner
            .projects
            .values()
            .filter(|p| p.is_collaborator(user_id))
            .cloned()
            .collect();
        projects.sort_by_key(|p| (p.created_at, p.id));
        Ok(projects)
    }

    async fn save_project(&self, project: &Project) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if !inner.projects.contains_key(&project.id) {
            return Err(StoreError::NotFound);
        }
        inner.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.projects.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        let task_ids: Vec<Uuid> = inner
            .tasks
            .values()
            .filter(|t| t.project_id == id)
            .map(|t| t.id)
            .collect();
        for task_id in &task_ids {
            inner.tasks.remove(task_id);
        }
        inner.notes.retain(|_, n| !task_ids.contains(&n.task_id));
        Ok(())
    }

    async fn insert_task(&self, task: &Task) -> StoreResult<()> {
        self.inner.write().await.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn task_by_id(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(self.inner.read().await.tasks.get(&id).cloned())
    }

    async fn tasks_by_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        let inner = self.inner.read().await;
        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| (t.created_at, t.id));
        Ok(tasks)
    }

    async fn save_task(&self, task: &Task) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if !inner.tasks.contains_key(&task.id) {
            return Err(StoreError::NotFound);
        }
        inner.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.tasks.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        inner.notes.retain(|_, n| n.task_id != id);
        Ok(())
    }

    async fn insert_note(&self, note: &Note) -> StoreResult<()> {
        self.inner.write().await.notes.insert(note.id, note.clone());
        Ok(())
    }

    async fn note_by_id(&self, id: Uuid) -> StoreResult<Option<Note>> {
        Ok(self.inner.read().await.notes.get(&id).cloned())
    }

    async fn notes_by_task(&self, task_id: Uuid) -> StoreResult<Vec<Note>> {
        let inner = self.inner.read().await;
        let mut notes: Vec<Note> = inner
            .notes
            .values()
            .filter(|n| n.task_id == task_id)
            .cloned()
            .collect();
        notes.sort_by_key(|n| (n.created_at, n.id));
        Ok(notes)
    }

    async fn delete_note(&self, id: Uuid) -> StoreResult<()> {
        match self.inner.write().await.notes.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    fn user(email: &str) -> User {
        User::new("Test User", email, "hash".to_string())
    }

    #[tokio::test]
    async fn test_user_roundtrip_and_email_lookup() {
        let store = MemStore::new();
        let u = user("a@example.com");
        store.insert_user(&u).await.unwrap();

        let by_id = store.user_by_id(u.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@example.com");

        let by_email = store.user_by_email("a@example.com").await.unwrap();
        assert!(by_email.is_some());
        assert!(store.user_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemStore::new();
        store.insert_user(&user("a@example.com")).await.unwrap();

        let result = store.insert_user(&user("a@example.com")).await;
        assert!(matches!(result, Err(StoreError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_save_user_requires_existing() {
        let store = MemStore::new();
        let u = user("a@example.com");
        assert!(matches!(
            store.save_user(&u).await,
            Err(StoreError::NotFound)
        ));

        store.insert_user(&u).await.unwrap();
        let mut updated = u.clone();
        updated.confirmed = true;
        store.save_user(&updated).await.unwrap();
        assert!(store.user_by_id(u.id).await.unwrap().unwrap().confirmed);
    }

    #[tokio::test]
    async fn test_save_user_rejects_email_collision() {
        let store = MemStore::new();
        let a = user("a@example.com");
        let b = user("b@example.com");
        store.insert_user(&a).await.unwrap();
        store.insert_user(&b).await.unwrap();

        let mut renamed = b.clone();
        renamed.email = "a@example.com".to_string();
        assert!(matches!(
            store.save_user(&renamed).await,
            Err(StoreError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn test_token_lookup_and_delete() {
        let store = MemStore::new();
        let u = user("a@example.com");
        store.insert_user(&u).await.unwrap();

        let token = OneTimeToken::issue(u.id);
        store.insert_token(&token).await.unwrap();

        let found = store.token_by_code(&token.code).await.unwrap().unwrap();
        assert_eq!(found.user_id, u.id);

        store.delete_token(token.id).await.unwrap();
        assert!(store.token_by_code(&token.code).await.unwrap().is_none());
        assert!(matches!(
            store.delete_token(token.id).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_projects_for_user_covers_manager_and_team() {
        let store = MemStore::new();
        let manager = Uuid::new_v4();
        let member = Uuid::new_v4();
        let outsider = Uuid::new_v4();

        let mut p1 = Project::new("P1", "C", "D", manager);
        p1.team.push(member);
        let p2 = Project::new("P2", "C", "D", member);
        store.insert_project(&p1).await.unwrap();
        store.insert_project(&p2).await.unwrap();

        let managers_view = store.projects_for_user(manager).await.unwrap();
        assert_eq!(managers_view.len(), 1);

        let members_view = store.projects_for_user(member).await.unwrap();
        assert_eq!(members_view.len(), 2);

        assert!(store.projects_for_user(outsider).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_project_cascades_to_tasks_and_notes() {
        let store = MemStore::new();
        let manager = Uuid::new_v4();
        let project = Project::new("P", "C", "D", manager);
        store.insert_project(&project).await.unwrap();

        let mut task = Task::new(project.id, "T", "D");
        task.set_status(TaskStatus::InProgress, manager);
        store.insert_task(&task).await.unwrap();

        let note = Note::new(task.id, manager, "note");
        store.insert_note(&note).await.unwrap();

        store.delete_project(project.id).await.unwrap();

        assert!(store.task_by_id(task.id).await.unwrap().is_none());
        assert!(store.note_by_id(note.id).await.unwrap().is_none());
        assert!(store.tasks_by_project(project.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_task_cascades_to_notes() {
        let store = MemStore::new();
        let project = Project::new("P", "C", "D", Uuid::new_v4());
        store.insert_project(&project).await.unwrap();

        let task = Task::new(project.id, "T", "D");
        store.insert_task(&task).await.unwrap();
        let note = Note::new(task.id, Uuid::new_v4(), "note");
        store.insert_note(&note).await.unwrap();

        store.delete_task(task.id).await.unwrap();
        assert!(store.note_by_id(note.id).await.unwrap().is_none());
        assert!(store.project_by_id(project.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_users_by_ids_skips_missing() {
        let store = MemStore::new();
        let a = user("a@example.com");
        let b = user("b@example.com");
        store.insert_user(&a).await.unwrap();
        store.insert_user(&b).await.unwrap();

        let found = store
            .users_by_ids(&[a.id, Uuid::new_v4(), b.id])
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_notes_by_task_sorted_oldest_first() {
        let store = MemStore::new();
        let task_id = Uuid::new_v4();
        let author = Uuid::new_v4();

        let first = Note::new(task_id, author, "first");
        let second = Note::new(task_id, author, "second");
        store.insert_note(&second).await.unwrap();
        store.insert_note(&first).await.unwrap();

        let notes = store.notes_by_task(task_id).await.unwrap();
        assert_eq!(notes.len(), 2);
        assert!(notes[0].created_at <= notes[1].created_at);
    }
}
