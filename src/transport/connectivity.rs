//! Channel connectivity state.
//!
//! # States
//! - Idle: no connection, none being established
//! - Connecting: a dial is in flight
//! - Ready: a connection is established
//! - TransientFailure: the last dial failed, within the backoff window
//!
//! # State Transitions
//! ```text
//! Idle/TransientFailure → Connecting: dial started
//! Connecting → Ready: dial succeeded
//! Connecting → TransientFailure: dial failed
//! Ready → Idle: connection dropped
//! TransientFailure → Idle: backoff window elapsed
//! ```
//!
//! # Design Decisions
//! - Lock-free: state and failure time are atomics, read without I/O
//! - The backoff window lets the next query dial again once it elapses

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Locally observable condition of a transport channel.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connectivity {
    Idle = 0,
    Connecting = 1,
    Ready = 2,
    TransientFailure = 3,
}

impl From<u8> for Connectivity {
    fn from(val: u8) -> Self {
        match val {
            1 => Connectivity::Connecting,
            2 => Connectivity::Ready,
            3 => Connectivity::TransientFailure,
            _ => Connectivity::Idle,
        }
    }
}

impl std::fmt::Display for Connectivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Connectivity::Idle => "IDLE",
            Connectivity::Connecting => "CONNECTING",
            Connectivity::Ready => "READY",
            Connectivity::TransientFailure => "TRANSIENT_FAILURE",
        };
        f.write_str(name)
    }
}

/// Shared connectivity tracker for one channel.
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone)]
pub struct ConnectivityState {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    state: AtomicU8,
    /// Milliseconds since `epoch` of the last failed dial.
    failed_at_ms: AtomicU64,
    epoch: Instant,
    backoff: Duration,
}

impl ConnectivityState {
    pub fn new(backoff: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: AtomicU8::new(Connectivity::Idle as u8),
                failed_at_ms: AtomicU64::new(0),
                epoch: Instant::now(),
                backoff,
            }),
        }
    }

    /// Current connectivity. Never performs I/O.
    pub fn get(&self) -> Connectivity {
        let state = Connectivity::from(self.inner.state.load(Ordering::Acquire));
        if state == Connectivity::TransientFailure && self.backoff_elapsed() {
            return Connectivity::Idle;
        }
        state
    }

    pub fn mark_connecting(&self) {
        self.store(Connectivity::Connecting);
    }

    pub fn mark_ready(&self) {
        self.store(Connectivity::Ready);
    }

    pub fn mark_failure(&self) {
        self.inner
            .failed_at_ms
            .store(self.elapsed_ms(), Ordering::Release);
        self.store(Connectivity::TransientFailure);
    }

    /// Ready → Idle. A dial started meanwhile keeps its own state.
    pub fn mark_disconnected(&self) {
        let _ = self.inner.state.compare_exchange(
            Connectivity::Ready as u8,
            Connectivity::Idle as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    fn store(&self, state: Connectivity) {
        let previous = Connectivity::from(self.inner.state.swap(state as u8, Ordering::AcqRel));
        if previous != state {
            tracing::trace!(from = %previous, to = %state, "Channel connectivity changed");
        }
    }

    fn backoff_elapsed(&self) -> bool {
        let failed_at = self.inner.failed_at_ms.load(Ordering::Acquire);
        let backoff_ms = u64::try_from(self.inner.backoff.as_millis()).unwrap_or(u64::MAX);
        self.elapsed_ms().saturating_sub(failed_at) >= backoff_ms
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.inner.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
