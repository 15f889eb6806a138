//! Outcomes of the non-failing lifecycle operations

use std::fmt;

/// Result of verifying (and if needed repairing) a client connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The client was connected; no I/O was performed
    AlreadyConnected,
    /// The client was disconnected and a reconnect succeeded
    Reconnected,
    /// Reconnected, but the platform no longer accepts the session
    Unauthorized,
    /// The reconnect call returned but the transport is still down
    StillDisconnected,
    /// The reconnect attempt raised an error
    Failed { reason: String },
}

impl EnsureOutcome {
    /// Whether the client may be used for requests
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::AlreadyConnected | Self::Reconnected)
    }
}

impl fmt::Display for EnsureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyConnected => f.write_str("already connected"),
            Self::Reconnected => f.write_str("reconnected"),
            Self::Unauthorized => f.write_str("reconnected but session is no longer authorized"),
            Self::StillDisconnected => f.write_str("still disconnected after reconnect"),
            Self::Failed { reason } => write!(f, "reconnect failed: {}", reason),
        }
    }
}

/// Result of releasing the managed client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Nothing was held
    Empty,
    /// The client was disconnected and released
    Disconnected,
    /// The client was released but its disconnect call failed
    DisconnectFailed { reason: String },
}

impl CleanupOutcome {
    /// Whether a client was held before cleanup
    pub fn released(&self) -> bool {
        !matches!(self, Self::Empty)
    }

    /// Whether cleanup finished without errors
    pub fn is_clean(&self) -> bool {
        !matches!(self, Self::DisconnectFailed { .. })
    }
}
