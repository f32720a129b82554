//! State reporting for services.
//!
//! # Responsibilities
//! - Hold the state a service currently reports
//! - Answer `getServiceState` with it
//!
//! # Design Decisions
//! - Stored as a raw ordinal so a service can report any wire value
//! - Lock-free; clones share the same state

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::health::HealthState;
use crate::proto::{GetServiceStateReply, GetServiceStateRequest, ServiceBase};

/// Shared, updatable state answered over `ServiceBase`.
#[derive(Debug, Clone)]
pub struct StateReporter {
    state: Arc<AtomicI32>,
}

impl StateReporter {
    pub fn new(initial: HealthState) -> Self {
        Self {
            state: Arc::new(AtomicI32::new(initial.value())),
        }
    }

    /// Report `state` from now on.
    pub fn set(&self, state: HealthState) {
        self.report_ordinal(state.value());
    }

    /// Report a raw wire ordinal, valid or not.
    pub fn report_ordinal(&self, ordinal: i32) {
        let previous = self.state.swap(ordinal, Ordering::AcqRel);
        if previous != ordinal {
            tracing::debug!(from = previous, to = ordinal, "Reported state changed");
        }
    }

    pub fn ordinal(&self) -> i32 {
        self.state.load(Ordering::Acquire)
    }

    pub fn get(&self) -> HealthState {
        HealthState::from_wire(self.ordinal())
    }
}

impl Default for StateReporter {
    fn default() -> Self {
        Self::new(HealthState::Idle)
    }
}

#[async_trait]
impl ServiceBase for StateReporter {
    async fn get_service_state(
        &self,
        _request: tonic::Request<GetServiceStateRequest>,
    ) -> Result<tonic::Response<GetServiceStateReply>, tonic::Status> {
        let state = self.ordinal();
        tracing::trace!(state, "getServiceState");
        Ok(tonic::Response::new(GetServiceStateReply { state }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answers_current_state() {
        let reporter = StateReporter::new(HealthState::Running);
        let reply = reporter
            .get_service_state(tonic::Request::new(GetServiceStateRequest {}))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(reply.state, HealthState::Running.value());

        let shared = reporter.clone();
        shared.set(HealthState::Error);
        assert_eq!(reporter.get(), HealthState::Error);
    }

    #[test]
    fn raw_ordinals_pass_through() {
        let reporter = StateReporter::default();
        assert_eq!(reporter.get(), HealthState::Idle);
        reporter.report_ordinal(99);
        assert_eq!(reporter.ordinal(), 99);
        assert_eq!(reporter.get(), HealthState::Unknown);
    }
}
