//! Route handlers.
//!
//! Handlers run after their route's guards and read what the guards attached
//! (`CurrentUser`, `CurrentTodo`) from request extensions.

pub mod health;
pub mod todos;
pub mod users;

use axum::{extract::rejection::JsonRejection, Json};

use crate::http::error::ApiError;

/// Unwrap a JSON body, turning extractor rejections into a 400 with a JSON body.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| {
            ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
        })
}
