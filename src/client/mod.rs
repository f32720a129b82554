//! Service client subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceClient::get_health (service.rs)
//!     → transport.connectivity()      local, never suspends
//!         TransientFailure → UNAVAILABLE (no call)
//!     → transport.get_service_state() one attempt, suspends
//!         Ok(ordinal) → HealthState::from_wire
//!         Err(_)      → UNAVAILABLE
//!
//! StatePoller::run (poller.rs)
//!     interval tick → get_health → watch channel
//! ```
//!
//! # Design Decisions
//! - The query is total: callers never handle transport errors
//! - Generic over `StateTransport` so the probe/call split is testable
//! - Polling lives beside the client, not inside it

pub mod poller;
pub mod service;

#[cfg(test)]
pub(crate) mod fake;

pub use poller::StatePoller;
pub use service::ServiceClient;
