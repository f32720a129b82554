//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! GrpcTransport::new (channel.rs)
//!     → lazy tonic Channel
//!     → TrackedConnector (connector.rs) dials on first call
//!     → ConnectivityState (connectivity.rs) records the outcome
//!
//! Query:
//!     connectivity() → local atomic read
//!     get_service_state() → unary RPC with deadline → ClientError on failure
//! ```
//!
//! # Design Decisions
//! - `StateTransport` is the seam the client is generic over
//! - Errors stay inside this crate; callers only ever see a HealthState

pub mod channel;
pub mod connectivity;
pub mod connector;
pub mod error;

pub use channel::{GrpcTransport, StateTransport};
pub use connectivity::{Connectivity, ConnectivityState};
pub use error::{ClientError, ClientResult};
