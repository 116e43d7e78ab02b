//! API error taxonomy.
//!
//! Every failure a request can end with is one of these kinds. They render as
//! `{ "error": "<message>" }` with the matching status code.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

pub const USER_NOT_FOUND: &str = "User not found!";
pub const TODO_OWNER_NOT_FOUND: &str = "User not found";
pub const TODO_NOT_FOUND: &str = "Todo not found";
pub const NOT_PRO: &str = "User is not PRO";
pub const ID_NOT_UUID: &str = "Id is not uuid";
pub const USERNAME_TAKEN: &str = "Username already exists";
pub const ALREADY_PRO: &str = "Pro plan is already activated.";
pub const INVALID_DEADLINE: &str = "Invalid deadline";

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Terminal request failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// A user or task is absent (404).
    #[error("{0}")]
    NotFound(String),

    /// The request clashes with current state (400).
    #[error("{0}")]
    Conflict(String),

    /// The caller's plan does not allow the operation (403).
    #[error("{0}")]
    Forbidden(String),

    /// Malformed input (400).
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken => ApiError::conflict(USERNAME_TAKEN),
            StoreError::AlreadyPro => ApiError::conflict(ALREADY_PRO),
            StoreError::UserNotFound => ApiError::not_found(USER_NOT_FOUND),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = %status, error = %self, "Request rejected");
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Replace the body of a failed response that is not already JSON with
/// `{ "error": "<reason phrase>" }`.
///
/// Covers rejections produced outside the handlers: request timeouts, body
/// limits, unknown routes and methods. Status and other headers are kept.
pub async fn json_error_body(response: Response) -> Response {
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if !(status.is_client_error() || status.is_server_error()) || is_json {
        return response;
    }

    let body = ErrorBody {
        error: status.canonical_reason().unwrap_or("Request failed").to_string(),
    };
    let bytes = match serde_json::to_vec(&body) {
        Ok(bytes) => bytes,
        Err(_) => return response,
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Response::from_parts(parts, Body::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        to_json(err.into_response()).await
    }

    async fn to_json(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_error_kinds_map_to_status_codes() {
        let cases = [
            (ApiError::not_found(USER_NOT_FOUND), StatusCode::NOT_FOUND),
            (ApiError::conflict(USERNAME_TAKEN), StatusCode::BAD_REQUEST),
            (ApiError::forbidden(NOT_PRO), StatusCode::FORBIDDEN),
            (ApiError::bad_request(ID_NOT_UUID), StatusCode::BAD_REQUEST),
        ];

        for (err, expected) in cases {
            let message = err.to_string();
            let (status, body) = render(err).await;
            assert_eq!(status, expected);
            assert_eq!(body, serde_json::json!({ "error": message }));
        }
    }

    #[tokio::test]
    async fn test_plain_failures_get_json_bodies() {
        let timed_out = StatusCode::REQUEST_TIMEOUT.into_response();
        let (status, body) = to_json(json_error_body(timed_out).await).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body, serde_json::json!({ "error": "Request Timeout" }));

        let too_large = (StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded").into_response();
        let (status, body) = to_json(json_error_body(too_large).await).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, serde_json::json!({ "error": "Payload Too Large" }));
    }

    #[tokio::test]
    async fn test_json_and_success_responses_pass_through() {
        let api_error = ApiError::forbidden(NOT_PRO).into_response();
        let (status, body) = to_json(json_error_body(api_error).await).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, serde_json::json!({ "error": NOT_PRO }));

        let no_content = json_error_body(StatusCode::NO_CONTENT.into_response()).await;
        assert_eq!(no_content.status(), StatusCode::NO_CONTENT);
        let bytes = axum::body::to_bytes(no_content.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_store_errors_convert() {
        assert_eq!(
            ApiError::from(StoreError::AlreadyPro),
            ApiError::Conflict(ALREADY_PRO.into())
        );
        assert_eq!(
            ApiError::from(StoreError::UsernameTaken),
            ApiError::Conflict(USERNAME_TAKEN.into())
        );
    }
}
