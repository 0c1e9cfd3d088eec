//! Time sources for envelope timestamps.
//!
//! Two readings matter to the protocol: wall-clock epoch milliseconds for the
//! signature timestamp, and monotonic milliseconds since the client started
//! for every "since start" field and for advancing location fixes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::Utc;

pub trait Clock: Send + Sync {
    /// Wall-clock time in milliseconds since the Unix epoch.
    fn timestamp_ms(&self) -> u64;

    /// Monotonic milliseconds since the client was constructed.
    fn since_start_ms(&self) -> u64;
}

/// Production clock: `chrono` for the wall clock, `Instant` for elapsed time.
#[derive(Debug, Clone)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn timestamp_ms(&self) -> u64 {
        Utc::now().timestamp_millis().max(0) as u64
    }

    fn since_start_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// A clock that only moves when told to. Used in tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    epoch_base_ms: u64,
    elapsed_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(epoch_base_ms: u64) -> Self {
        Self {
            epoch_base_ms,
            elapsed_ms: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.elapsed_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn timestamp_ms(&self) -> u64 {
        self.epoch_base_ms + self.elapsed_ms.load(Ordering::SeqCst)
    }

    fn since_start_ms(&self) -> u64 {
        self.elapsed_ms.load(Ordering::SeqCst)
    }
}
