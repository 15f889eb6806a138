//! Messaging client interface
//!
//! The connection manager never talks to the platform directly. It drives a
//! client library through these two traits: a factory that binds a client to
//! the session file and credentials, and the client itself.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by a client library
#[derive(Debug, Error)]
pub enum ClientError {
    /// A credential required to build the client is not configured
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    /// The client could not be constructed
    #[error("failed to build client: {0}")]
    Build(String),

    /// Network or protocol failure while talking to the platform
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Session storage could not be read or written
    #[error("session storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Transport failure without an underlying cause
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Transport failure wrapping the library's own error
    pub fn transport_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Short, stable name of the error variant for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential(_) => "MissingCredential",
            Self::Build(_) => "Build",
            Self::Transport { .. } => "Transport",
            Self::Io(_) => "Io",
        }
    }
}

/// An authenticated session with the remote messaging service.
///
/// Connectivity and authorization status belong to the implementation; the
/// manager only queries and drives them.
#[async_trait]
pub trait MessagingClient: Send + Sync + 'static {
    /// Open (or re-open) the underlying connection
    async fn connect(&self) -> Result<(), ClientError>;

    /// Whether the transport is currently up
    fn is_connected(&self) -> bool;

    /// Whether the platform accepts the stored session
    async fn is_user_authorized(&self) -> Result<bool, ClientError>;

    /// Close the underlying connection
    async fn disconnect(&self) -> Result<(), ClientError>;
}

/// Builds clients bound to the configured session storage and credentials
#[async_trait]
pub trait ClientFactory: Send + Sync + 'static {
    type Client: MessagingClient;

    /// Construct a new, not yet connected client
    async fn build(&self, config: &Config) -> Result<Self::Client, ClientError>;
}
