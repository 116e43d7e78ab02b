//! Configuration validation.
//!
//! Serde covers the syntax; this module checks the values make sense:
//! - the bind address parses as a socket address
//! - timeouts and limits are non-zero
//!
//! Every failure is reported, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("limits.free_tier_todo_limit must be greater than zero")]
    ZeroTodoLimit,

    #[error("limits.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.limits.free_tier_todo_limit == 0 {
        errors.push(ValidationError::ZeroTodoLimit);
    }
    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServiceConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.limits.free_tier_todo_limit = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidBindAddress("not-an-address".into()),
                ValidationError::ZeroRequestTimeout,
                ValidationError::ZeroTodoLimit,
            ]
        );
    }
}
