//! Generic remote-service health-state client.
//!
//! A [`ServiceClient`] owns a lazily connected gRPC channel to one service
//! and answers [`ServiceClient::get_health`] with a [`HealthState`], never an
//! error. [`StateReporter`] is the serving side of the same query.

pub mod client;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod proto;
pub mod server;
pub mod transport;

pub use client::{ServiceClient, StatePoller};
pub use config::{ClientConfig, ConnectionTarget};
pub use health::HealthState;
pub use lifecycle::Shutdown;
pub use server::StateReporter;
pub use transport::{Connectivity, StateTransport};
