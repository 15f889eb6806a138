//! Scripted client and factory shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chatlink::{ClientError, ClientFactory, Config, MessagingClient};

pub fn test_config() -> Arc<Config> {
    let config = Config::from_toml_str(
        r#"
        [session]
        path = "/nonexistent/chatlink-test.session"

        [credentials]
        api_id = 4242
        api_hash = "deadbeef"
        "#,
    )
    .unwrap();
    Arc::new(config)
}

/// Observable state of one scripted client
#[derive(Debug, Default)]
pub struct ClientState {
    pub connected: AtomicBool,
    pub authorized: AtomicBool,
    pub fail_connect: AtomicBool,
    pub fail_authorization_check: AtomicBool,
    /// `connect()` succeeds but leaves the transport down
    pub connect_is_noop: AtomicBool,
    pub fail_disconnect: AtomicBool,
    /// Delay before answering the authorization check
    pub auth_delay_ms: AtomicUsize,
    pub connect_calls: AtomicUsize,
    pub disconnect_calls: AtomicUsize,
}

impl ClientState {
    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Simulate the transport dropping
    pub fn drop_connection(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn set(&self, flag: &AtomicBool, value: bool) {
        flag.store(value, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct ScriptedClient {
    pub state: Arc<ClientState>,
}

#[async_trait]
impl MessagingClient for ScriptedClient {
    async fn connect(&self) -> Result<(), ClientError> {
        self.state.connect_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_connect.load(Ordering::SeqCst) {
            let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
            return Err(ClientError::transport_with("connect failed", io));
        }
        if !self.state.connect_is_noop.load(Ordering::SeqCst) {
            self.state.connected.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.connected.load(Ordering::SeqCst)
    }

    async fn is_user_authorized(&self) -> Result<bool, ClientError> {
        let delay = self.state.auth_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }
        if self.state.fail_authorization_check.load(Ordering::SeqCst) {
            return Err(ClientError::transport("auth check timed out"));
        }
        Ok(self.state.authorized.load(Ordering::SeqCst))
    }

    async fn disconnect(&self) -> Result<(), ClientError> {
        self.state.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        self.state.connected.store(false, Ordering::SeqCst);
        if self.state.fail_disconnect.load(Ordering::SeqCst) {
            return Err(ClientError::transport("connection reset during disconnect"));
        }
        Ok(())
    }
}

/// Behaviour applied to every client the factory builds
#[derive(Debug, Default)]
pub struct FactoryScript {
    pub failing_builds: AtomicUsize,
    pub unauthorized: AtomicBool,
    pub fail_connect: AtomicBool,
    pub fail_authorization_check: AtomicBool,
    pub build_delay_ms: AtomicUsize,
    pub auth_delay_ms: AtomicUsize,
}

#[derive(Clone, Default)]
pub struct ScriptedFactory {
    pub script: Arc<FactoryScript>,
    builds: Arc<AtomicUsize>,
    clients: Arc<Mutex<Vec<Arc<ClientState>>>>,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// State of every client built so far, in build order
    pub fn clients(&self) -> Vec<Arc<ClientState>> {
        self.clients.lock().clone()
    }

    pub fn fail_next_builds(&self, count: usize) {
        self.script.failing_builds.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl ClientFactory for ScriptedFactory {
    type Client = ScriptedClient;

    async fn build(&self, config: &Config) -> Result<ScriptedClient, ClientError> {
        self.builds.fetch_add(1, Ordering::SeqCst);

        let delay = self.script.build_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }

        let remaining = self.script.failing_builds.load(Ordering::SeqCst);
        if remaining > 0 {
            self.script.failing_builds.store(remaining - 1, Ordering::SeqCst);
            return Err(ClientError::Build("session storage locked".to_string()));
        }

        if !config.credentials.api_hash_set() {
            return Err(ClientError::MissingCredential("api_hash"));
        }

        let state = Arc::new(ClientState::default());
        state.set(&state.authorized, !self.script.unauthorized.load(Ordering::SeqCst));
        state.set(&state.fail_connect, self.script.fail_connect.load(Ordering::SeqCst));
        state.set(
            &state.fail_authorization_check,
            self.script.fail_authorization_check.load(Ordering::SeqCst),
        );
        state.auth_delay_ms.store(
            self.script.auth_delay_ms.load(Ordering::SeqCst),
            Ordering::SeqCst,
        );
        self.clients.lock().push(state.clone());

        Ok(ScriptedClient { state })
    }
}
