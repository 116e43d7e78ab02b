//! `/users` handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::guards::CurrentUser;
use crate::http::handlers::json_body;
use crate::http::server::AppState;
use crate::store::User;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub username: String,
}

/// `POST /users`
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let request = json_body(payload)?;
    let user = state.store.create_user(&request.name, &request.username)?;

    tracing::info!(user_id = %user.id, username = %user.username, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/{id}`
pub async fn get_user(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}

/// `PATCH /users/{id}/pro`
pub async fn activate_pro(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<User>, ApiError> {
    let user = state.store.activate_pro(user.id)?;

    tracing::info!(user_id = %user.id, "Pro plan activated");
    Ok(Json(user))
}
