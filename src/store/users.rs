//! In-memory user store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::store::model::{Todo, User};
use crate::store::StoreError;

/// Ordered collection of users, shared between request handlers.
///
/// Lookups are linear scans and hand out snapshots; mutations go through the
/// store so they happen under the write lock.
#[derive(Clone, Default)]
pub struct UserStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl UserStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// First user whose username matches exactly (case-sensitive).
    pub fn find_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .iter()
            .find(|user| user.username == username)
            .cloned()
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.users.read().iter().find(|user| user.id == id).cloned()
    }

    /// Append a user without any uniqueness check.
    pub fn insert(&self, user: User) {
        self.users.write().push(user);
    }

    /// Register a new user, refusing a username that is already taken.
    ///
    /// The check and the append share one write lock.
    pub fn create_user(&self, name: &str, username: &str) -> Result<User, StoreError> {
        let mut users = self.users.write();
        if users.iter().any(|user| user.username == username) {
            return Err(StoreError::UsernameTaken);
        }
        let user = User::new(name, username);
        users.push(user.clone());
        Ok(user)
    }

    /// Move a user onto the pro plan.
    pub fn activate_pro(&self, id: Uuid) -> Result<User, StoreError> {
        self.with_user(id, |user| {
            if user.pro {
                return Err(StoreError::AlreadyPro);
            }
            user.pro = true;
            Ok(user.clone())
        })
        .unwrap_or(Err(StoreError::UserNotFound))
    }

    /// Append a task to a user's list, returning it.
    pub fn add_todo(&self, user_id: Uuid, todo: Todo) -> Option<Todo> {
        self.with_user(user_id, |user| {
            user.todos.push(todo.clone());
            todo
        })
    }

    pub fn update_todo(
        &self,
        user_id: Uuid,
        todo_id: Uuid,
        title: String,
        deadline: DateTime<Utc>,
    ) -> Option<Todo> {
        self.with_user(user_id, |user| user.update_todo(todo_id, title, deadline))
            .flatten()
    }

    pub fn mark_todo_done(&self, user_id: Uuid, todo_id: Uuid) -> Option<Todo> {
        self.with_user(user_id, |user| user.mark_todo_done(todo_id))
            .flatten()
    }

    /// Remove a task from its owner's list. Returns `false` if it was not there.
    pub fn remove_todo(&self, user_id: Uuid, todo_id: Uuid) -> bool {
        self.with_user(user_id, |user| user.remove_todo(todo_id))
            .unwrap_or(false)
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_user<R>(&self, id: Uuid, f: impl FnOnce(&mut User) -> R) -> Option<R> {
        let mut users = self.users.write();
        users.iter_mut().find(|user| user.id == id).map(f)
    }
}
