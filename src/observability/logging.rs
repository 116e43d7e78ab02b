//! Structured logging.
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to this
//! crate and to `tower_http`'s request spans.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
pub fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("todo_service={level},tower_http={level}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_targets_crate_and_http() {
        let filter = default_filter("debug").to_string();
        assert!(filter.contains("todo_service=debug"));
        assert!(filter.contains("tower_http=debug"));
    }
}
