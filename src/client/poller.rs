//! Periodic state polling.
//!
//! # Responsibilities
//! - Query one service on a fixed interval
//! - Publish the latest state to watchers
//! - Stop cleanly on shutdown, even mid-query
//!
//! # Design Decisions
//! - Missed ticks are delayed, never bursted, when a query outlasts the interval
//! - Watchers are only woken on a state change
//! - No hysteresis: every observed state is published as-is
//! - Intervals below `MIN_POLL_INTERVAL` are raised to it

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::time::{self, MissedTickBehavior};

use crate::client::service::ServiceClient;
use crate::health::HealthState;
use crate::transport::StateTransport;

/// Shortest interval a poller runs at.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Background poller keeping a watch channel up to date with a service's state.
pub struct StatePoller<T> {
    client: Arc<ServiceClient<T>>,
    interval: Duration,
    tx: watch::Sender<HealthState>,
}

impl<T: StateTransport> StatePoller<T> {
    /// Create a poller and the receiver it publishes to.
    ///
    /// The receiver starts at `HealthState::Unavailable`. An interval
    /// shorter than `MIN_POLL_INTERVAL` is raised to it.
    pub fn new(
        client: Arc<ServiceClient<T>>,
        interval: Duration,
    ) -> (Self, watch::Receiver<HealthState>) {
        if interval < MIN_POLL_INTERVAL {
            tracing::warn!(
                requested_ms = interval_ms(interval),
                "Poll interval too short, using minimum"
            );
        }
        let interval = interval.max(MIN_POLL_INTERVAL);
        let (tx, rx) = watch::channel(HealthState::default());
        (
            Self {
                client,
                interval,
                tx,
            },
            rx,
        )
    }

    /// Subscribe another watcher.
    pub fn subscribe(&self) -> watch::Receiver<HealthState> {
        self.tx.subscribe()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            service = %self.client.target(),
            interval_ms = interval_ms(self.interval),
            "State poller starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let state = tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                state = async {
                    ticker.tick().await;
                    self.client.get_health().await
                } => state,
            };

            let previous = *self.tx.borrow();
            if previous != state {
                tracing::info!(
                    service = %self.client.target(),
                    from = previous.name(),
                    to = state.name(),
                    "Service state changed"
                );
            }
            self.tx.send_if_modified(|current| {
                let changed = *current != state;
                *current = state;
                changed
            });
        }

        tracing::info!(service = %self.client.target(), "State poller received shutdown signal, exiting loop");
    }
}

fn interval_ms(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}
