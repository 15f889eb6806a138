//! Error types

use std::path::PathBuf;
use thiserror::Error;

use crate::client::ClientError;
use crate::manager::EnsureOutcome;

/// Result alias for connection manager operations
pub type Result<T> = std::result::Result<T, Error>;

/// Connection manager errors
#[derive(Debug, Error)]
pub enum Error {
    /// The platform rejected the stored session
    #[error("session {session_path:?} is not authorized; run the setup flow to authorize it first")]
    Unauthorized { session_path: PathBuf },

    /// The client could not be built or connected
    #[error("failed to create client: {0}")]
    Connection(#[from] ClientError),

    /// A handle was acquired but could not be brought into a usable state
    #[error("client connection is not usable: {0}")]
    Unusable(EnsureOutcome),
}

impl Error {
    /// Short, stable name of the error for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "Unauthorized",
            Self::Connection(e) => e.kind(),
            Self::Unusable(_) => "Unusable",
        }
    }

    /// Whether the caller must re-run the authorization flow
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. } | Self::Unusable(EnsureOutcome::Unauthorized)
        )
    }
}
