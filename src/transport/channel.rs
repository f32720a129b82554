//! gRPC transport channel to one service.
//!
//! # Responsibilities
//! - Build a lazily connected channel to `address:port`
//! - Expose the channel's connectivity without performing I/O
//! - Issue the unary state query with a deadline
//!
//! # Design Decisions
//! - Construction never dials; the first query does
//! - Each query clones the channel handle; the connection is shared
//! - Timeouts are enforced with Tokio, cancellation is drop

use std::time::Duration;

use async_trait::async_trait;
use hyper_util::client::legacy::connect::HttpConnector;
use tokio::time::timeout;
use tonic::transport::{Channel, Endpoint};

use crate::config::{ConnectionTarget, TimeoutConfig};
use crate::proto::{GetServiceStateRequest, ServiceBaseClient};
use crate::transport::connectivity::{Connectivity, ConnectivityState};
use crate::transport::connector::TrackedConnector;
use crate::transport::error::{ClientError, ClientResult};

/// The two operations a service client needs from its transport.
#[async_trait]
pub trait StateTransport: Send + Sync {
    /// Local read of the channel's connectivity. Must not block.
    fn connectivity(&self) -> Connectivity;

    /// Single attempt at the remote state query, returning the wire ordinal.
    async fn get_service_state(&self) -> ClientResult<i32>;
}

/// Plaintext gRPC transport.
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    channel: Channel,
    connectivity: ConnectivityState,
    request_timeout: Duration,
}

impl GrpcTransport {
    /// Open a lazy channel to `target`.
    ///
    /// Must be called within a Tokio runtime. Fails only when the target
    /// does not form a valid URI; an unreachable target is not an error.
    pub fn new(target: &ConnectionTarget, timeouts: &TimeoutConfig) -> ClientResult<Self> {
        let uri = target.uri();
        let endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|_| ClientError::InvalidTarget(uri))?;

        let mut http = HttpConnector::new();
        http.set_nodelay(true);
        http.set_connect_timeout(Some(timeouts.connect()));

        let connectivity = ConnectivityState::new(timeouts.reconnect_backoff());
        let connector = TrackedConnector::new(http, connectivity.clone());
        let channel = endpoint.connect_with_connector_lazy(connector);

        tracing::debug!(
            address = %target.server_address(),
            connect_timeout_ms = timeouts.connect_ms,
            request_timeout_ms = timeouts.request_ms,
            "gRPC channel created"
        );

        Ok(Self {
            channel,
            connectivity,
            request_timeout: timeouts.request(),
        })
    }

    /// Shared handle to the connectivity tracker.
    pub fn connectivity_state(&self) -> &ConnectivityState {
        &self.connectivity
    }
}

#[async_trait]
impl StateTransport for GrpcTransport {
    fn connectivity(&self) -> Connectivity {
        self.connectivity.get()
    }

    async fn get_service_state(&self) -> ClientResult<i32> {
        let mut stub = ServiceBaseClient::new(self.channel.clone());
        let call = stub.get_service_state(GetServiceStateRequest {});

        match timeout(self.request_timeout, call).await {
            Ok(Ok(response)) => Ok(response.into_inner().state),
            Ok(Err(status)) => Err(ClientError::Rpc(status)),
            Err(_) => Err(ClientError::Timeout(self.request_timeout)),
        }
    }
}
