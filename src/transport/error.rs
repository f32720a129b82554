//! Transport error definitions.
//!
//! These never leave the client: `ServiceClient::get_health` collapses every
//! variant to `HealthState::Unavailable`.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while querying a service's state.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The connection target does not form a valid endpoint URI.
    #[error("invalid service endpoint '{0}'")]
    InvalidTarget(String),

    /// The channel reported a transient failure; no call was made.
    #[error("transport is in transient failure")]
    TransientFailure,

    /// The remote call completed with a non-OK status.
    #[error("RPC failed: {0}")]
    Rpc(#[from] tonic::Status),

    /// The remote call did not complete before the deadline.
    #[error("RPC timeout after {0:?}")]
    Timeout(Duration),
}

/// Result type for transport operations.
pub type ClientResult<T> = Result<T, ClientError>;
