//! Request identification and caller headers.
//!
//! # Design Decisions
//! - Every request gets an `x-request-id` (UUID v4) unless the client sent one,
//!   and the id is echoed on the response (see `server.rs`)
//! - The caller is named by the `username` header, trusted without verification

use axum::http::{HeaderMap, HeaderName};

/// Header carrying the request id.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Header carrying the caller's username. Trusted as-is; there is no credential check.
pub const USERNAME_HEADER: HeaderName = HeaderName::from_static("username");

/// The caller's username, if the header is present and valid UTF-8.
pub fn username(headers: &HeaderMap) -> Option<&str> {
    headers.get(USERNAME_HEADER).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_username_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(username(&headers), None);

        headers.insert(USERNAME_HEADER, HeaderValue::from_static("ada"));
        assert_eq!(username(&headers), Some("ada"));
    }
}
