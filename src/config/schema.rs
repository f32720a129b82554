//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for a service client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// The remote service to query.
    pub service: ConnectionTarget,

    /// Transport timeouts.
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Caller-side polling settings.
    #[serde(default)]
    pub poll: PollConfig,

    /// Observability settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl ClientConfig {
    /// Configuration for `target` with every other section defaulted.
    pub fn new(target: ConnectionTarget) -> Self {
        Self {
            service: target,
            timeouts: TimeoutConfig::default(),
            poll: PollConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Address and port of one remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ConnectionTarget {
    /// Host name or IP address of the server.
    #[serde(default = "default_address")]
    pub address: String,

    /// Port of the server.
    pub port: u16,
}

fn default_address() -> String {
    "localhost".to_string()
}

impl ConnectionTarget {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }

    /// Target on `localhost`.
    pub fn localhost(port: u16) -> Self {
        Self::new(default_address(), port)
    }

    /// Returns the composed address and port.
    pub fn server_address(&self) -> String {
        if self.address.contains(':') && !self.address.starts_with('[') {
            format!("[{}]:{}", self.address, self.port)
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }

    /// Plaintext gRPC endpoint URI.
    pub fn uri(&self) -> String {
        format!("http://{}", self.server_address())
    }
}

impl std::fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.server_address())
    }
}

/// Timeout configuration for the transport channel.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in milliseconds.
    pub connect_ms: u64,

    /// Deadline for one state query in milliseconds.
    pub request_ms: u64,

    /// How long a failed dial is reported as a transient failure
    /// before the channel is allowed to dial again, in milliseconds.
    pub reconnect_backoff_ms: u64,
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    pub fn request(&self) -> Duration {
        Duration::from_millis(self.request_ms)
    }

    pub fn reconnect_backoff(&self) -> Duration {
        Duration::from_millis(self.reconnect_backoff_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: 1_000,
            request_ms: 1_000,
            reconnect_backoff_ms: 1_000,
        }
    }
}

/// Caller-side polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollConfig {
    /// Interval between state queries in milliseconds.
    pub interval_ms: u64,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_ms: 500 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_address_composition() {
        assert_eq!(ConnectionTarget::localhost(50051).server_address(), "localhost:50051");
        assert_eq!(ConnectionTarget::new("::1", 80).server_address(), "[::1]:80");
        assert_eq!(ConnectionTarget::new("10.0.0.5", 1).uri(), "http://10.0.0.5:1");
    }

    #[test]
    fn default_sections() {
        let config = ClientConfig::new(ConnectionTarget::localhost(9999));
        assert_eq!(config.timeouts.request(), Duration::from_secs(1));
        assert_eq!(config.poll.interval(), Duration::from_millis(500));
        assert!(!config.observability.metrics_enabled);
    }
}
