//! Connection manager
//!
//! Holds at most one authenticated client. Construction is serialized by an
//! async mutex so concurrent first callers share a single client.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::outcome::{CleanupOutcome, EnsureOutcome};
use super::stats::{ManagerStats, StatsSnapshot};
use crate::client::{ClientError, ClientFactory, MessagingClient};
use crate::config::Config;
use crate::diagnostics::{DiagnosticInfo, ErrorReport};
use crate::error::{Error, Result};

/// Manages the lifecycle of a single messaging client
pub struct ConnectionManager<F: ClientFactory> {
    /// Credentials and session location
    config: Arc<Config>,
    /// Builds new clients
    factory: F,
    /// The live client, if any
    slot: RwLock<Option<Arc<F::Client>>>,
    /// Serializes construction and cleanup
    init_lock: Mutex<()>,
    /// Lifecycle counters
    stats: ManagerStats,
}

impl<F: ClientFactory> ConnectionManager<F> {
    /// Create a new connection manager with an empty slot
    pub fn new(config: Arc<Config>, factory: F) -> Self {
        Self {
            config,
            factory,
            slot: RwLock::new(None),
            init_lock: Mutex::new(()),
            stats: ManagerStats::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The current client, without constructing one
    pub fn current(&self) -> Option<Arc<F::Client>> {
        self.slot.read().clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.slot.read().is_some()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Return the managed client, building and connecting it on first use.
    ///
    /// An existing client is returned as-is, without re-checking its
    /// connection or authorization; use [`ensure_connection`] for that.
    /// On failure nothing is stored, so the next call builds from scratch.
    ///
    /// [`ensure_connection`]: Self::ensure_connection
    pub async fn acquire_or_create(&self) -> Result<Arc<F::Client>> {
        if let Some(client) = self.current() {
            return Ok(client);
        }

        let _guard = self.init_lock.lock().await;

        // Another caller may have finished construction while we waited
        if let Some(client) = self.current() {
            return Ok(client);
        }

        let client = self.create_client().await?;
        *self.slot.write() = Some(client.clone());

        self.stats.client_created();
        info!(session_path = ?self.config.session.path, "Client connected and authorized");

        Ok(client)
    }

    /// Acquire the client and make sure it is connected before returning it
    pub async fn acquire_connected(&self) -> Result<Arc<F::Client>> {
        let client = self.acquire_or_create().await?;
        let outcome = self.ensure_connection(client.as_ref()).await;
        if outcome.is_usable() {
            Ok(client)
        } else {
            Err(Error::Unusable(outcome))
        }
    }

    /// Verify a client is connected, reconnecting it once if it is not.
    ///
    /// Never fails: errors are logged and reported through the outcome.
    pub async fn ensure_connection<C>(&self, client: &C) -> EnsureOutcome
    where
        C: MessagingClient + ?Sized,
    {
        if client.is_connected() {
            return EnsureOutcome::AlreadyConnected;
        }

        warn!("Client disconnected, attempting to reconnect");
        self.stats.reconnect_attempted();

        let outcome = match reconnect(client).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let info = DiagnosticInfo::new(ErrorReport::new(e.kind(), &e));
                error!(
                    error = %e,
                    diagnostic_info = %info.to_json(),
                    "Error ensuring connection"
                );
                EnsureOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        if !outcome.is_usable() {
            self.stats.reconnect_failed();
        }
        outcome
    }

    /// Disconnect and release the managed client.
    ///
    /// The slot is always empty afterwards, even if the disconnect fails.
    /// Shares the construction lock: a build already in flight finishes
    /// first, and the client it produced is the one released here.
    pub async fn cleanup(&self) -> CleanupOutcome {
        let _guard = self.init_lock.lock().await;

        let taken = self.slot.write().take();
        let client = match taken {
            Some(client) => client,
            None => {
                debug!("Cleanup requested with no client held");
                return CleanupOutcome::Empty;
            }
        };

        match client.disconnect().await {
            Ok(()) => {
                self.stats.disconnected();
                info!("Client disconnected");
                CleanupOutcome::Disconnected
            }
            Err(e) => {
                self.stats.disconnect_failed();
                error!(error = %e, "Error disconnecting client");
                CleanupOutcome::DisconnectFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Build, connect and authorize a new client
    async fn create_client(&self) -> Result<Arc<F::Client>> {
        let client = self
            .factory
            .build(&self.config)
            .await
            .map_err(|e| self.construction_failed(e))?;
        let pending = PendingClient::new(client);

        let connected = pending.client().connect().await;
        if let Err(e) = connected {
            pending.disarm();
            return Err(self.construction_failed(e));
        }

        let authorized = match pending.client().is_user_authorized().await {
            Ok(authorized) => authorized,
            Err(e) => {
                pending.close().await;
                return Err(self.construction_failed(e));
            }
        };

        if !authorized {
            self.stats.unauthorized();
            let err = Error::Unauthorized {
                session_path: self.config.session.path.clone(),
            };
            self.log_construction_failure(&err);
            pending.close().await;
            return Err(err);
        }

        Ok(pending.keep())
    }

    /// Count and log a client library failure during construction
    fn construction_failed(&self, e: ClientError) -> Error {
        self.stats.construction_failed();
        let err = Error::Connection(e);
        self.log_construction_failure(&err);
        err
    }

    fn log_construction_failure(&self, err: &Error) {
        let info = self.failure_diagnostics(err);
        error!(
            error = %err,
            diagnostic_info = %info.to_json(),
            "Failed to create client"
        );
    }

    /// Error report plus which config values were available
    fn failure_diagnostics(&self, err: &Error) -> DiagnosticInfo {
        DiagnosticInfo::new(ErrorReport::new(err.kind(), err)).with_config(self.config.presence())
    }
}

/// Reconnect once and report the resulting state
async fn reconnect<C>(client: &C) -> std::result::Result<EnsureOutcome, ClientError>
where
    C: MessagingClient + ?Sized,
{
    client.connect().await?;

    if !client.is_user_authorized().await? {
        error!("Client reconnected but not authorized");
        return Ok(EnsureOutcome::Unauthorized);
    }

    if client.is_connected() {
        info!("Successfully reconnected client");
        Ok(EnsureOutcome::Reconnected)
    } else {
        warn!("Reconnect returned but client is still disconnected");
        Ok(EnsureOutcome::StillDisconnected)
    }
}

/// Close a client that will not be stored
async fn discard<C: MessagingClient>(client: &C) {
    if let Err(e) = client.disconnect().await {
        debug!(error = %e, "Failed to close rejected client");
    }
}

/// A freshly built client that is closed unless it is kept.
///
/// If the acquiring future is dropped mid-handshake the guard is dropped
/// while armed, and a disconnect is spawned on the current runtime.
struct PendingClient<C: MessagingClient> {
    client: Arc<C>,
    armed: bool,
}

impl<C: MessagingClient> PendingClient<C> {
    fn new(client: C) -> Self {
        Self {
            client: Arc::new(client),
            armed: true,
        }
    }

    fn client(&self) -> &C {
        &self.client
    }

    /// Give up on the client without closing it (nothing was opened)
    fn disarm(mut self) {
        self.armed = false;
    }

    /// Close the client and give it up
    async fn close(mut self) {
        self.armed = false;
        discard(&*self.client).await;
    }

    /// Hand the client over to the caller
    fn keep(mut self) -> Arc<C> {
        self.armed = false;
        self.client.clone()
    }
}

impl<C: MessagingClient> Drop for PendingClient<C> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let client = self.client.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("Closing client abandoned during construction");
                handle.spawn(async move {
                    discard(&*client).await;
                });
            }
            Err(_) => {
                warn!("Client abandoned during construction outside a runtime, not disconnected");
            }
        }
    }
}
