//! Generic service client.
//!
//! # Responsibilities
//! - Own the connection target and transport channel of one service
//! - Answer "what is this service's current health?" without ever failing
//!
//! # Design Decisions
//! - Cheap local connectivity check before the remote call
//! - One attempt per query; retry policy belongs to the caller
//! - Every transport or RPC failure classifies as UNAVAILABLE

use std::time::Duration;

use crate::config::{ClientConfig, ConnectionTarget, TimeoutConfig};
use crate::health::HealthState;
use crate::observability::metrics;
use crate::transport::{
    ClientError, ClientResult, Connectivity, GrpcTransport, StateTransport,
};

/// Client reporting the health of one remote service.
///
/// Queries take `&self`; share the client behind an `Arc` to query it from
/// several tasks.
#[derive(Debug)]
pub struct ServiceClient<T = GrpcTransport> {
    target: ConnectionTarget,
    transport: T,
    span: tracing::Span,
}

impl ServiceClient<GrpcTransport> {
    /// Client for `target` with default timeouts.
    ///
    /// Must be called within a Tokio runtime. No connection is attempted
    /// until the first query.
    pub fn new(target: ConnectionTarget) -> ClientResult<Self> {
        Self::with_timeouts(target, &TimeoutConfig::default())
    }

    pub fn with_timeouts(target: ConnectionTarget, timeouts: &TimeoutConfig) -> ClientResult<Self> {
        let transport = GrpcTransport::new(&target, timeouts)?;
        Ok(Self::with_transport(target, transport))
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::with_timeouts(config.service.clone(), &config.timeouts)
    }
}

impl<T: StateTransport> ServiceClient<T> {
    /// Client over an already built transport.
    pub fn with_transport(target: ConnectionTarget, transport: T) -> Self {
        let span = tracing::debug_span!("service_client", service = %target);
        tracing::debug!(parent: &span, config = ?target, "Config in ServiceClient");
        Self {
            target,
            transport,
            span,
        }
    }

    /// Emit this client's events under `span` instead of the default one.
    pub fn instrument(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    /// Returns the composed address and port.
    pub fn server_address(&self) -> String {
        self.target.server_address()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current channel connectivity, read locally.
    pub fn connectivity(&self) -> Connectivity {
        self.transport.connectivity()
    }

    /// Current health of the service.
    ///
    /// Never fails: an unreachable service, a failed call or an elapsed
    /// deadline all classify as `Unavailable`. Cancelling the returned
    /// future leaves the client usable.
    pub async fn get_health(&self) -> HealthState {
        let state = match self.query().await {
            Ok(state) => state,
            Err(e) => {
                tracing::debug!(parent: &self.span, error = %e, "State query failed");
                HealthState::Unavailable
            }
        };

        metrics::record_service_state(&self.target.server_address(), state);
        tracing::debug!(
            parent: &self.span,
            port = self.target.port,
            state = state.name(),
            "Service state"
        );
        state
    }

    async fn query(&self) -> ClientResult<HealthState> {
        if self.transport.connectivity() == Connectivity::TransientFailure {
            return Err(ClientError::TransientFailure);
        }

        let ordinal = self.transport.get_service_state().await?;
        let state = HealthState::from_wire(ordinal);
        if state.value() != ordinal {
            tracing::warn!(parent: &self.span, ordinal, "Service reported an out-of-range state");
        }
        Ok(state)
    }

    /// Query every `interval` until the service is RUNNING or IDLE.
    ///
    /// Does not return on its own while the service stays down; bound it
    /// with `tokio::time::timeout`.
    pub async fn wait_until_ready(&self, interval: Duration) -> HealthState {
        loop {
            let state = self.get_health().await;
            if state.is_ready() {
                return state;
            }
            tracing::debug!(parent: &self.span, state = state.name(), "Waiting for service");
            tokio::time::sleep(interval).await;
        }
    }

    /// Consume the client, dropping its transport.
    ///
    /// The channel's connection closes once no in-flight query still holds
    /// a clone of it; dropping the client has the same effect.
    pub fn close(self) {
        tracing::debug!(parent: &self.span, "Service client closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeTransport;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn fake_client(transport: FakeTransport) -> ServiceClient<FakeTransport> {
        ServiceClient::with_transport(ConnectionTarget::localhost(50051), transport)
    }

    #[tokio::test]
    async fn transient_failure_skips_remote_call() {
        let client = fake_client(FakeTransport::reporting(HealthState::Running.value()));
        client.transport().set_connectivity(Connectivity::TransientFailure);

        assert_eq!(client.get_health().await, HealthState::Unavailable);
        assert_eq!(client.transport().calls(), 0);
    }

    #[tokio::test]
    async fn other_connectivity_states_issue_one_call() {
        let client = fake_client(FakeTransport::reporting(HealthState::Idle.value()));
        for (idx, connectivity) in [Connectivity::Idle, Connectivity::Connecting, Connectivity::Ready]
            .into_iter()
            .enumerate()
        {
            client.transport().set_connectivity(connectivity);
            assert_eq!(client.get_health().await, HealthState::Idle);
            assert_eq!(client.transport().calls(), idx + 1);
        }
    }

    #[tokio::test]
    async fn reported_state_is_returned_verbatim() {
        for state in HealthState::ALL {
            let client = fake_client(FakeTransport::reporting(state.value()));
            assert_eq!(client.get_health().await, state);
        }
    }

    #[tokio::test]
    async fn out_of_range_ordinal_is_unknown() {
        let client = fake_client(FakeTransport::reporting(17));
        assert_eq!(client.get_health().await, HealthState::Unknown);

        let client = fake_client(FakeTransport::reporting(-3));
        assert_eq!(client.get_health().await, HealthState::Unknown);
    }

    #[tokio::test]
    async fn rpc_failures_are_unavailable() {
        let client = fake_client(FakeTransport::new(|call| match call {
            0 => Err(ClientError::Rpc(tonic::Status::unavailable("connection refused"))),
            1 => Err(ClientError::Rpc(tonic::Status::internal("boom"))),
            _ => Err(ClientError::Timeout(Duration::from_millis(10))),
        }));

        for _ in 0..3 {
            assert_eq!(client.get_health().await, HealthState::Unavailable);
        }
        assert_eq!(client.transport().calls(), 3);
    }

    #[tokio::test]
    async fn repeated_queries_agree() {
        let client = fake_client(FakeTransport::reporting(HealthState::Running.value()));
        let first = client.get_health().await;
        let second = client.get_health().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn recovers_after_unavailable() {
        let client = fake_client(FakeTransport::new(|call| {
            if call == 0 {
                Err(ClientError::Rpc(tonic::Status::unavailable("down")))
            } else {
                Ok(HealthState::Running.value())
            }
        }));
        assert_eq!(client.get_health().await, HealthState::Unavailable);
        assert_eq!(client.get_health().await, HealthState::Running);
    }

    #[tokio::test]
    async fn concurrent_queries_share_the_client() {
        let client = Arc::new(fake_client(
            FakeTransport::reporting(HealthState::Idle.value()).with_delay(Duration::from_millis(20)),
        ));
        let (a, b) = tokio::join!(client.get_health(), client.get_health());
        assert_eq!(a, HealthState::Idle);
        assert_eq!(b, HealthState::Idle);
        assert_eq!(client.transport().calls(), 2);
    }

    #[tokio::test]
    async fn cancelled_query_leaves_client_usable() {
        let client = fake_client(
            FakeTransport::reporting(HealthState::Running.value()).with_delay(Duration::from_millis(50)),
        );
        for _ in 0..3 {
            let cancelled = tokio::time::timeout(Duration::from_millis(5), client.get_health()).await;
            assert!(cancelled.is_err());
        }
        assert_eq!(client.get_health().await, HealthState::Running);
    }

    #[tokio::test]
    async fn wait_until_ready_polls_until_up() {
        let client = fake_client(FakeTransport::new(|call| {
            if call < 3 {
                Ok(HealthState::Unavailable.value())
            } else {
                Ok(HealthState::Idle.value())
            }
        }));
        let state = client.wait_until_ready(Duration::from_millis(1)).await;
        assert_eq!(state, HealthState::Idle);
        assert_eq!(client.transport().calls(), 4);
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn logs_state_through_the_installed_subscriber() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let client = fake_client(FakeTransport::reporting(HealthState::Error.value()));
        assert_eq!(client.get_health().await, HealthState::Error);

        let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Service state"));
        assert!(output.contains("ERROR"));
        assert!(output.contains("port=50051"));
    }
}
