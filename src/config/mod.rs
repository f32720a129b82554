//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → ConnectionTarget + TimeoutConfig handed to the client
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - Every section except the service target has defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ClientConfig;
pub use schema::ConnectionTarget;
pub use schema::ObservabilityConfig;
pub use schema::PollConfig;
pub use schema::TimeoutConfig;
