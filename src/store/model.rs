//! User and task records.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::id;

/// A registered user and the tasks they own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    /// Only ever moves from `false` to `true`.
    pub pro: bool,
    pub todos: Vec<Todo>,
}

impl User {
    /// A new free-plan user with no tasks.
    pub fn new(name: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id::generate(),
            name: name.into(),
            username: username.into(),
            pro: false,
            todos: Vec::new(),
        }
    }

    /// Look up one of this user's tasks.
    pub fn todo(&self, todo_id: Uuid) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == todo_id)
    }

    fn todo_mut(&mut self, todo_id: Uuid) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == todo_id)
    }

    pub(crate) fn update_todo(
        &mut self,
        todo_id: Uuid,
        title: String,
        deadline: DateTime<Utc>,
    ) -> Option<Todo> {
        let todo = self.todo_mut(todo_id)?;
        todo.title = title;
        todo.deadline = deadline;
        Some(todo.clone())
    }

    pub(crate) fn mark_todo_done(&mut self, todo_id: Uuid) -> Option<Todo> {
        let todo = self.todo_mut(todo_id)?;
        todo.done = true;
        Some(todo.clone())
    }

    pub(crate) fn remove_todo(&mut self, todo_id: Uuid) -> bool {
        match self.todos.iter().position(|todo| todo.id == todo_id) {
            Some(index) => {
                self.todos.remove(index);
                true
            }
            None => false,
        }
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub deadline: DateTime<Utc>,
    /// Only ever moves from `false` to `true`.
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// A new open task created now.
    pub fn new(title: impl Into<String>, deadline: DateTime<Utc>) -> Self {
        Self {
            id: id::generate(),
            title: title.into(),
            deadline,
            done: false,
            created_at: Utc::now(),
        }
    }
}

/// Parse a deadline given either as RFC 3339 or as a bare `YYYY-MM-DD` date.
///
/// Bare dates are taken as midnight UTC.
pub fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_free_and_empty() {
        let user = User::new("Ada", "ada");
        assert!(!user.pro);
        assert!(user.todos.is_empty());
        assert_eq!(user.username, "ada");
    }

    #[test]
    fn test_parse_deadline_accepts_date_and_timestamp() {
        assert_eq!(
            parse_deadline("2030-01-01"),
            Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_deadline("2030-01-01T12:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2030, 1, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(parse_deadline("tomorrow"), None);
        assert_eq!(parse_deadline("2030-13-01"), None);
    }

    #[test]
    fn test_todo_edits_keep_identity_and_creation_time() {
        let mut user = User::new("Ada", "ada");
        let todo = Todo::new("write", parse_deadline("2030-01-01").unwrap());
        user.todos.push(todo.clone());

        let new_deadline = parse_deadline("2031-06-01").unwrap();
        let updated = user
            .update_todo(todo.id, "rewrite".into(), new_deadline)
            .unwrap();
        assert_eq!(updated.id, todo.id);
        assert_eq!(updated.title, "rewrite");
        assert_eq!(updated.deadline, new_deadline);
        assert_eq!(updated.created_at, todo.created_at);
        assert!(!updated.done);

        assert!(user.mark_todo_done(todo.id).unwrap().done);
        assert!(user.remove_todo(todo.id));
        assert!(!user.remove_todo(todo.id));
    }

    #[test]
    fn test_serialized_shape() {
        let user = User::new("Ada", "ada");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["pro"], false);
        assert_eq!(json["todos"], serde_json::json!([]));
        assert_eq!(json["id"], user.id.to_string());

        let todo = Todo::new("x", parse_deadline("2030-01-01").unwrap());
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["deadline"], "2030-01-01T00:00:00Z");
        assert_eq!(json["done"], false);
        assert!(json.get("created_at").is_some());
    }
}
