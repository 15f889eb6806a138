//! Lifecycle counters
//!
//! Lock-free counters kept per manager and mirrored to the `metrics` facade.

use metrics::counter;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic lifecycle counters
#[derive(Debug, Default)]
pub struct ManagerStats {
    clients_created: AtomicU64,
    construction_failures: AtomicU64,
    unauthorized: AtomicU64,
    reconnect_attempts: AtomicU64,
    reconnect_failures: AtomicU64,
    disconnects: AtomicU64,
    disconnect_errors: AtomicU64,
}

impl ManagerStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn client_created(&self) {
        self.clients_created.fetch_add(1, Ordering::Relaxed);
        counter!("chatlink_clients_created_total").increment(1);
    }

    #[inline]
    pub fn construction_failed(&self) {
        self.construction_failures.fetch_add(1, Ordering::Relaxed);
        counter!("chatlink_construction_failures_total").increment(1);
    }

    #[inline]
    pub fn unauthorized(&self) {
        self.unauthorized.fetch_add(1, Ordering::Relaxed);
        counter!("chatlink_unauthorized_total").increment(1);
    }

    #[inline]
    pub fn reconnect_attempted(&self) {
        self.reconnect_attempts.fetch_add(1, Ordering::Relaxed);
        counter!("chatlink_reconnect_attempts_total").increment(1);
    }

    #[inline]
    pub fn reconnect_failed(&self) {
        self.reconnect_failures.fetch_add(1, Ordering::Relaxed);
        counter!("chatlink_reconnect_failures_total").increment(1);
    }

    #[inline]
    pub fn disconnected(&self) {
        self.disconnects.fetch_add(1, Ordering::Relaxed);
        counter!("chatlink_disconnects_total").increment(1);
    }

    #[inline]
    pub fn disconnect_failed(&self) {
        self.disconnect_errors.fetch_add(1, Ordering::Relaxed);
        counter!("chatlink_disconnect_errors_total").increment(1);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            clients_created: self.clients_created.load(Ordering::Relaxed),
            construction_failures: self.construction_failures.load(Ordering::Relaxed),
            unauthorized: self.unauthorized.load(Ordering::Relaxed),
            reconnect_attempts: self.reconnect_attempts.load(Ordering::Relaxed),
            reconnect_failures: self.reconnect_failures.load(Ordering::Relaxed),
            disconnects: self.disconnects.load(Ordering::Relaxed),
            disconnect_errors: self.disconnect_errors.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of counters for reporting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub clients_created: u64,
    pub construction_failures: u64,
    pub unauthorized: u64,
    pub reconnect_attempts: u64,
    pub reconnect_failures: u64,
    pub disconnects: u64,
    pub disconnect_errors: u64,
}
