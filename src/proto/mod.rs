//! `farm_ng.service.proto.ServiceBase` wire protocol.
//!
//! # Responsibilities
//! - Declare the request/reply messages of the state query
//! - Client stub issuing the unary `getServiceState` call
//! - Server adapter exposing a `ServiceBase` implementation over gRPC
//!
//! # Design Decisions
//! - Messages are declared by hand with `prost` derives; the protocol is
//!   a single method, so no build-time code generation
//! - The reply carries the raw ordinal; classification happens in `health`

pub mod client;
pub mod server;

pub use client::ServiceBaseClient;
pub use server::{ServiceBase, ServiceBaseServer};

/// Fully-qualified gRPC service name.
pub const SERVICE_NAME: &str = "farm_ng.service.proto.ServiceBase";

/// Path of the state query method.
pub const GET_SERVICE_STATE_PATH: &str = "/farm_ng.service.proto.ServiceBase/getServiceState";

/// Empty request of the state query.
#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct GetServiceStateRequest {}

/// Reply of the state query.
#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct GetServiceStateReply {
    /// Self-reported `ServiceState` ordinal.
    #[prost(int32, tag = "1")]
    pub state: i32,
}
