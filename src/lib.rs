//! Multi-tenant to-do list service.
//!
//! Users register, may move to the pro plan, and manage their own task lists.
//! Free-plan users are capped at a configurable number of tasks (10 by
//! default). Callers identify themselves with a `username` header that is
//! trusted as-is. Everything is held in memory.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod store;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
