//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Client and server produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (per-service state gauge and query counter)
//!
//! Consumers:
//!     → stderr via tracing-subscriber
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
