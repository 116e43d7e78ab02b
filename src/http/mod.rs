//! HTTP surface of the service.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, route table)
//!     → guards.rs (per-route precondition checks, in order)
//!     → handlers/ (store reads and edits, response bodies)
//!     → error.rs ({ "error": ... } bodies for every rejection)
//! ```

pub mod error;
pub mod guards;
pub mod handlers;
pub mod request;
pub mod server;

pub use error::ApiError;
pub use request::{USERNAME_HEADER, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
