//! Request guards.
//!
//! Each guard inspects the request (headers, path, and whatever earlier guards
//! attached to its extensions) and either rejects it with an [`ApiError`] or
//! attaches what it found and hands the request on. Routes stack guards with
//! `ServiceBuilder`, so they run in the order they are listed.
//!
//! ```text
//! user_exists   username header        → CurrentUser     | 404 "User not found!"
//! pro_quota     CurrentUser            → (unchanged)     | 403 "User is not PRO"
//! todo_exists   path id, username hdr  → CurrentUser,    | 400 "Id is not uuid"
//!                                        CurrentTodo     | 404 "User not found"
//!                                                        | 404 "Todo not found"
//! user_by_id    path id                → CurrentUser     | 404 "User not found!"
//! ```

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
    Extension,
};
use uuid::Uuid;

use crate::http::error::{self, ApiError};
use crate::http::request;
use crate::http::server::AppState;
use crate::store::{id, Todo, User};

/// The user a request acts as, or on.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// The task a request targets, owned by the [`CurrentUser`].
#[derive(Debug, Clone)]
pub struct CurrentTodo(pub Todo);

/// Resolve the `username` header to a user.
pub async fn user_exists(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request::username(request.headers())
        .and_then(|username| state.store.find_by_username(username))
        .ok_or_else(|| {
            tracing::debug!(guard = "user_exists", "Unknown username");
            ApiError::not_found(error::USER_NOT_FOUND)
        })?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Refuse task creation for free-plan users at their limit.
pub async fn pro_quota(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let limit = state.limits.load().free_tier_todo_limit;
    if !user.pro && user.todos.len() >= limit {
        tracing::debug!(
            guard = "pro_quota",
            user_id = %user.id,
            todos = user.todos.len(),
            limit,
            "Free plan limit reached"
        );
        return Err(ApiError::forbidden(error::NOT_PRO));
    }

    Ok(next.run(request).await)
}

/// Resolve the path id to a task owned by the `username` caller.
///
/// Checks run in a fixed order: id format, then the caller, then ownership.
pub async fn todo_exists(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let todo_id = id::parse_v4(&raw_id).ok_or_else(|| {
        tracing::debug!(guard = "todo_exists", id = %raw_id, "Malformed task id");
        ApiError::bad_request(error::ID_NOT_UUID)
    })?;

    let user = request::username(request.headers())
        .and_then(|username| state.store.find_by_username(username))
        .ok_or_else(|| {
            tracing::debug!(guard = "todo_exists", "Unknown username");
            ApiError::not_found(error::TODO_OWNER_NOT_FOUND)
        })?;

    let todo = user.todo(todo_id).cloned().ok_or_else(|| {
        tracing::debug!(
            guard = "todo_exists",
            user_id = %user.id,
            todo_id = %todo_id,
            "Task not owned by caller"
        );
        ApiError::not_found(error::TODO_NOT_FOUND)
    })?;

    request.extensions_mut().insert(CurrentUser(user));
    request.extensions_mut().insert(CurrentTodo(todo));
    Ok(next.run(request).await)
}

/// Resolve the path id to a user.
pub async fn user_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = Uuid::parse_str(&raw_id)
        .ok()
        .and_then(|user_id| state.store.find_by_id(user_id))
        .ok_or_else(|| {
            tracing::debug!(guard = "user_by_id", id = %raw_id, "Unknown user id");
            ApiError::not_found(error::USER_NOT_FOUND)
        })?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}
