//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use service_client::config::{ConnectionTarget, TimeoutConfig};
use service_client::lifecycle::Shutdown;
use service_client::proto::ServiceBase;
use service_client::server::serve;
use service_client::{HealthState, ServiceClient, StateReporter};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A `ServiceBase` server running in the background.
pub struct MockService {
    pub addr: SocketAddr,
    shutdown: Shutdown,
    handle: JoinHandle<()>,
}

impl MockService {
    pub fn target(&self) -> ConnectionTarget {
        ConnectionTarget::new("127.0.0.1", self.addr.port())
    }

    /// Stop serving and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}

/// Serve `service` on `addr` (port 0 picks a free port).
pub async fn start_service<S: ServiceBase>(addr: SocketAddr, service: S) -> MockService {
    let listener = TcpListener::bind(addr).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let signal = shutdown.triggered();

    let handle = tokio::spawn(async move {
        serve(listener, service, signal).await.unwrap();
    });

    MockService {
        addr,
        shutdown,
        handle,
    }
}

/// Serve a `StateReporter` starting at `initial` on a free port.
#[allow(dead_code)]
pub async fn start_mock_service(initial: HealthState) -> (MockService, StateReporter) {
    let reporter = StateReporter::new(initial);
    let service = start_service(local_addr(0), reporter.clone()).await;
    (service, reporter)
}

pub fn local_addr(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

/// A port nothing is listening on.
#[allow(dead_code)]
pub async fn unused_port() -> u16 {
    let listener = TcpListener::bind(local_addr(0)).await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Short timeouts so failure paths finish quickly.
pub fn test_timeouts() -> TimeoutConfig {
    TimeoutConfig {
        connect_ms: 500,
        request_ms: 500,
        reconnect_backoff_ms: 50,
    }
}

pub fn client_for(target: ConnectionTarget) -> ServiceClient {
    ServiceClient::with_timeouts(target, &test_timeouts()).unwrap()
}
