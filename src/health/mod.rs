//! Service health classification.
//!
//! # Data Flow
//! ```text
//! Transport probe (transport/connectivity.rs)
//!     → TransientFailure → UNAVAILABLE
//!
//! Remote state query (proto/client.rs)
//!     → wire ordinal → HealthState::from_wire
//!     → call failure → UNAVAILABLE
//! ```
//!
//! # Design Decisions
//! - Closed five-variant enum owned by this crate, never the wire type
//! - Absence of information is UNAVAILABLE, not an error
//! - Out-of-range wire ordinals classify as UNKNOWN

pub mod state;

pub use state::HealthState;
