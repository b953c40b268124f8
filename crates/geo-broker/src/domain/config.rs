//! Broker configuration values.

use std::time::Duration;

use thiserror::Error;

use super::connection_manager::ConnectionConfig;

/// Broker-wide configuration
///
/// # Notes
///
/// - `worker_count`: inbound packets are sharded across this many workers by
///   sender identity, so packets from one sender are handled in order.
/// - `sweep_interval_ms`: period of the stale-session and retention sweep,
///   independent of packet traffic.
/// - `shutdown_timeout_ms`: upper bound on draining in-flight packets during
///   coordinated shutdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    /// Session liveness and retention policy
    pub connection: ConnectionConfig,
    /// Number of packet-processing workers (default: 4)
    pub worker_count: usize,
    /// Sweep period in milliseconds (default: 1000)
    pub sweep_interval_ms: u64,
    /// Drain bound in milliseconds (default: 5000)
    pub shutdown_timeout_ms: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            worker_count: 4,
            sweep_interval_ms: 1_000,
            shutdown_timeout_ms: 5_000,
        }
    }
}

impl BrokerConfig {
    /// Create a config suitable for testing (short windows)
    pub fn for_testing() -> Self {
        Self {
            connection: ConnectionConfig::for_testing(),
            worker_count: 2,
            sweep_interval_ms: 50,
            shutdown_timeout_ms: 500,
        }
    }

    /// Reject values that would stall the broker.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::Invalid("worker_count must be at least 1".into()));
        }
        if self.sweep_interval_ms == 0 {
            return Err(ConfigError::Invalid("sweep_interval_ms must be positive".into()));
        }
        if self.connection.heartbeat_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "heartbeat_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },

    /// TOML parsing error.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// A value is out of its allowed range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BrokerConfig::default().validate().is_ok());
        assert!(BrokerConfig::for_testing().validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = BrokerConfig {
            worker_count: 0,
            ..BrokerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_heartbeat_rejected() {
        let mut config = BrokerConfig::default();
        config.connection.heartbeat_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
