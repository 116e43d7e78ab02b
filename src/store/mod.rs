//! Storage subsystem.
//!
//! # Data Flow
//! ```text
//! handlers / guards
//!     → users.rs (UserStore: linear scans, in-place edits under a lock)
//!     → model.rs (User, Todo records)
//!     → id.rs (random v4 identifiers)
//! ```
//!
//! # Design Decisions
//! - Everything lives in memory and is lost on restart
//! - Users are never deleted; tasks are removed from their owner's list
//! - Reads return snapshots; callers re-enter the store to mutate

pub mod id;
pub mod model;
pub mod users;

use thiserror::Error;

pub use model::{parse_deadline, Todo, User};
pub use users::UserStore;

/// Failures reported by store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("username already exists")]
    UsernameTaken,

    #[error("user is already on the pro plan")]
    AlreadyPro,

    #[error("user not found")]
    UserNotFound,
}
