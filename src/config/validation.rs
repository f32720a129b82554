//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ClientConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("service.address must not be empty")]
    EmptyAddress,

    #[error("service.port must be in 1..=65535")]
    InvalidPort,

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.service.address.trim().is_empty() {
        errors.push(ValidationError::EmptyAddress);
    }
    if config.service.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    let durations = [
        ("timeouts.connect_ms", config.timeouts.connect_ms),
        ("timeouts.request_ms", config.timeouts.request_ms),
        ("timeouts.reconnect_backoff_ms", config.timeouts.reconnect_backoff_ms),
        ("poll.interval_ms", config.poll.interval_ms),
    ];
    for (field, value) in durations {
        if value == 0 {
            errors.push(ValidationError::ZeroDuration(field));
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
