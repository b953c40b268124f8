use crate::domain::BrokerConfig;
use crate::ports::ConfigProvider;

// ============================================================================
// StaticConfigProvider - Hardcoded config for testing/embedding
// ============================================================================

/// Static configuration provider.
///
/// Useful for tests and embedders that build config in code. For deployments,
/// use `TomlConfigProvider`.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    config: BrokerConfig,
}

impl StaticConfigProvider {
    /// Create with the default broker config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: BrokerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.config.worker_count = worker_count;
        self
    }

    #[must_use]
    pub fn with_heartbeat_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connection.heartbeat_timeout_secs = secs;
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn broker_config(&self) -> BrokerConfig {
        self.config.clone()
    }
}

// ============================================================================
// TomlConfigProvider - File-based config (requires "toml-config" feature)
// ============================================================================

#[cfg(feature = "toml-config")]
mod toml_config {
    use std::fs;
    use std::path::Path;

    use serde::Deserialize;

    use super::*;
    use crate::domain::{ConfigError, ConnectionConfig};

    /// Configuration file structure.
    #[derive(Debug, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    struct ConfigFile {
        #[serde(default)]
        broker: BrokerSection,
        #[serde(default)]
        connection: ConnectionSection,
    }

    #[derive(Debug, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    struct BrokerSection {
        worker_count: Option<usize>,
        sweep_interval_ms: Option<u64>,
        shutdown_timeout_ms: Option<u64>,
    }

    #[derive(Debug, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    struct ConnectionSection {
        heartbeat_timeout_secs: Option<u64>,
        session_retention_secs: Option<u64>,
    }

    /// TOML-based configuration provider.
    ///
    /// Every key is optional; missing keys take their defaults.
    ///
    /// # Config File Format
    ///
    /// ```toml
    /// [broker]
    /// worker_count = 4
    /// sweep_interval_ms = 1000
    /// shutdown_timeout_ms = 5000
    ///
    /// [connection]
    /// heartbeat_timeout_secs = 30
    /// session_retention_secs = 300
    /// ```
    #[derive(Debug, Clone)]
    pub struct TomlConfigProvider {
        config: BrokerConfig,
    }

    impl TomlConfigProvider {
        /// Load configuration from a TOML file.
        ///
        /// # Errors
        ///
        /// Returns error if the file cannot be read, parsed or validated.
        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
            let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
                path: path.as_ref().display().to_string(),
                error: e.to_string(),
            })?;

            Self::parse(&content)
        }

        /// Parse configuration from a TOML string.
        pub fn parse(content: &str) -> Result<Self, ConfigError> {
            let file: ConfigFile =
                toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

            let defaults = BrokerConfig::default();
            let connection_defaults = ConnectionConfig::default();
            let config = BrokerConfig {
                connection: ConnectionConfig {
                    heartbeat_timeout_secs: file
                        .connection
                        .heartbeat_timeout_secs
                        .unwrap_or(connection_defaults.heartbeat_timeout_secs),
                    session_retention_secs: file
                        .connection
                        .session_retention_secs
                        .unwrap_or(connection_defaults.session_retention_secs),
                },
                worker_count: file.broker.worker_count.unwrap_or(defaults.worker_count),
                sweep_interval_ms: file
                    .broker
                    .sweep_interval_ms
                    .unwrap_or(defaults.sweep_interval_ms),
                shutdown_timeout_ms: file
                    .broker
                    .shutdown_timeout_ms
                    .unwrap_or(defaults.shutdown_timeout_ms),
            };
            config.validate()?;

            Ok(Self { config })
        }
    }

    impl ConfigProvider for TomlConfigProvider {
        fn broker_config(&self) -> BrokerConfig {
            self.config.clone()
        }
    }
}

#[cfg(feature = "toml-config")]
pub use toml_config::TomlConfigProvider;
