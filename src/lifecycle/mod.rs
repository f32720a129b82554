//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → StatePoller::run exits
//!               → served reporters stop accepting
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
