//! `/todos` handlers. The caller is always named by the `username` header.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::http::error::{self, ApiError};
use crate::http::guards::{CurrentTodo, CurrentUser};
use crate::http::handlers::json_body;
use crate::http::server::AppState;
use crate::store::{parse_deadline, Todo};

/// Body of task creation and update requests.
#[derive(Debug, Deserialize)]
pub struct TodoRequest {
    pub title: String,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    pub deadline: String,
}

impl TodoRequest {
    fn into_parts(self) -> Result<(String, chrono::DateTime<chrono::Utc>), ApiError> {
        let deadline = parse_deadline(&self.deadline)
            .ok_or_else(|| ApiError::bad_request(error::INVALID_DEADLINE))?;
        Ok((self.title, deadline))
    }
}

/// `GET /todos`
pub async fn list_todos(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<Vec<Todo>> {
    Json(user.todos)
}

/// `POST /todos`
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let (title, deadline) = json_body(payload)?.into_parts()?;
    let todo = state
        .store
        .add_todo(user.id, Todo::new(title, deadline))
        .ok_or_else(|| ApiError::not_found(error::USER_NOT_FOUND))?;

    tracing::info!(user_id = %user.id, todo_id = %todo.id, "Task created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// `PUT /todos/{id}`
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(CurrentTodo(todo)): Extension<CurrentTodo>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let (title, deadline) = json_body(payload)?.into_parts()?;
    let todo = state
        .store
        .update_todo(user.id, todo.id, title, deadline)
        .ok_or_else(|| ApiError::not_found(error::TODO_NOT_FOUND))?;

    tracing::info!(user_id = %user.id, todo_id = %todo.id, "Task updated");
    Ok(Json(todo))
}

/// `PATCH /todos/{id}/done`
pub async fn mark_done(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(CurrentTodo(todo)): Extension<CurrentTodo>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state
        .store
        .mark_todo_done(user.id, todo.id)
        .ok_or_else(|| ApiError::not_found(error::TODO_NOT_FOUND))?;

    tracing::info!(user_id = %user.id, todo_id = %todo.id, "Task completed");
    Ok(Json(todo))
}

/// `DELETE /todos/{id}`
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(CurrentTodo(todo)): Extension<CurrentTodo>,
) -> Result<StatusCode, ApiError> {
    // The guard already saw the task, but another request may have removed it since.
    if !state.store.remove_todo(user.id, todo.id) {
        return Err(ApiError::not_found(error::TODO_NOT_FOUND));
    }

    tracing::info!(user_id = %user.id, todo_id = %todo.id, "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}
