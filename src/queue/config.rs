//! Queue configuration

use crate::queue::error::{QueueError, QueueResult};
use serde::Deserialize;

/// Default number of slots on the inbound port
pub const DEFAULT_INBOUND_CAPACITY: usize = 20;

/// Slots on the outbound port: one item of lookahead ahead of the consumer
pub const OUTBOUND_CAPACITY: usize = 1;

/// What the intake worker does with items still waiting on the inbound port
/// when the queue closes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShutdownPolicy {
    /// Stop immediately; unread inbound items are dropped and counted in the log
    #[default]
    Discard,
    /// Move every already-accepted inbound item into the buffer first, so
    /// `close()` hands all of them back to the caller
    Drain,
}

/// Configuration for a [`DynamicQueue`](crate::queue::DynamicQueue)
///
/// Every field has a default, so a partial TOML table is valid:
///
/// ```toml
/// name = "scan-results"
/// inbound_capacity = 64
/// shutdown = "drain"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Label used in log records
    pub name: String,
    /// Bounded capacity of the inbound port
    pub inbound_capacity: usize,
    pub shutdown: ShutdownPolicy,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: "queue".to_string(),
            inbound_capacity: DEFAULT_INBOUND_CAPACITY,
            shutdown: ShutdownPolicy::default(),
        }
    }
}

impl QueueConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_inbound_capacity(mut self, inbound_capacity: usize) -> Self {
        self.inbound_capacity = inbound_capacity;
        self
    }

    pub fn with_shutdown_policy(mut self, shutdown: ShutdownPolicy) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(text: &str) -> QueueResult<Self> {
        let config: QueueConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the queue cannot run with
    pub fn validate(&self) -> QueueResult<()> {
        if self.name.trim().is_empty() {
            return Err(QueueError::InvalidConfig {
                message: "name must not be empty".to_string(),
            });
        }
        // tokio channels panic on zero capacity
        if self.inbound_capacity == 0 {
            return Err(QueueError::InvalidConfig {
                message: "inbound_capacity must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QueueConfig::default();
        assert_eq!(config.name, "queue");
        assert_eq!(config.inbound_capacity, 20);
        assert_eq!(config.shutdown, ShutdownPolicy::Discard);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = QueueConfig::new("results")
            .with_inbound_capacity(5)
            .with_shutdown_policy(ShutdownPolicy::Drain);

        assert_eq!(config.name, "results");
        assert_eq!(config.inbound_capacity, 5);
        assert_eq!(config.shutdown, ShutdownPolicy::Drain);
    }

    #[test]
    fn test_from_toml_full_table() {
        let config = QueueConfig::from_toml_str(
            r#"
            name = "scan-results"
            inbound_capacity = 64
            shutdown = "drain"
            "#,
        )
        .unwrap();

        assert_eq!(config.name, "scan-results");
        assert_eq!(config.inbound_capacity, 64);
        assert_eq!(config.shutdown, ShutdownPolicy::Drain);
    }

    #[test]
    fn test_from_toml_partial_table_uses_defaults() {
        let config = QueueConfig::from_toml_str("inbound_capacity = 3").unwrap();
        assert_eq!(config.name, "queue");
        assert_eq!(config.inbound_capacity, 3);
        assert_eq!(config.shutdown, ShutdownPolicy::Discard);
    }

    #[test]
    fn test_from_toml_rejects_zero_capacity() {
        match QueueConfig::from_toml_str("inbound_capacity = 0") {
            Err(QueueError::InvalidConfig { message }) => {
                assert!(message.contains("inbound_capacity"));
            }
            other => panic!("Expected InvalidConfig error, got: {:?}", other),
        }
    }

    #[test]
    fn test_from_toml_rejects_unknown_policy() {
        let result = QueueConfig::from_toml_str(r#"shutdown = "flush""#);
        assert!(matches!(result, Err(QueueError::ConfigParse(_))));
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let config = QueueConfig::new("   ");
        assert!(matches!(
            config.validate(),
            Err(QueueError::InvalidConfig { .. })
        ));
    }
}
