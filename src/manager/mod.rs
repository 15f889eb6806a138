//! Connection lifecycle management
//!
//! Owns the client handle: lazy construction, on-demand repair and teardown.

mod lifecycle;
mod outcome;
mod stats;

pub use lifecycle::ConnectionManager;
pub use outcome::{CleanupOutcome, EnsureOutcome};
pub use stats::{ManagerStats, StatsSnapshot};
