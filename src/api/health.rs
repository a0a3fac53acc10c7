//! Shared health state for the /health endpoint.
//! Updated by the startup probe, /api/connection and /api/tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::types::ConnectionStatus;

pub struct HealthState {
    /// Outcome of the most recent connectivity probe.
    connection: Mutex<ConnectionStatus>,
    /// Full sweeps run since start.
    sweeps_run: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            connection: Mutex::new(ConnectionStatus::Pending),
            sweeps_run: AtomicU64::new(0),
        }
    }

    pub fn set_connection(&self, status: ConnectionStatus) {
        if let Ok(mut c) = self.connection.lock() {
            *c = status;
        }
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
            .lock()
            .map(|c| c.clone())
            .unwrap_or(ConnectionStatus::Pending)
    }

    pub fn inc_sweeps_run(&self) {
        self.sweeps_run.fetch_add(1, Ordering::Relaxed);
    }

    pub fn sweeps_run(&self) -> u64 {
        self.sweeps_run.load(Ordering::Relaxed)
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}
