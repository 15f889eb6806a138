//! Chatlink - connection lifecycle for a messaging-platform client
//!
//! Owns a single authenticated client handle: builds it lazily, repairs
//! dropped connections on demand and tears it down on shutdown.

pub mod client;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod manager;
pub mod util;

pub use client::{ClientError, ClientFactory, MessagingClient};
pub use config::Config;
pub use error::{Error, Result};
pub use manager::{CleanupOutcome, ConnectionManager, EnsureOutcome};

/// Library version for display
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
