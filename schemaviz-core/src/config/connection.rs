//! Dev database connection configuration.

use crate::{Result, error::SchemaVizError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on pool size for the scratch database.
const MAX_POOL_SIZE: u32 = 16;

/// Configuration for connections to the scratch (dev) database.
///
/// The dev database never holds user data; it is only inspected, so small
/// pools and short timeouts are enough.
///
/// # Example
/// ```rust
/// use schemaviz_core::config::ConnectionConfig;
/// use std::time::Duration;
///
/// let config = ConnectionConfig::default()
///     .with_connect_timeout(Duration::from_secs(5))
///     .with_max_connections(2);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Time allowed to establish (or acquire) a connection
    pub connect_timeout: Duration,
    /// Maximum number of pooled connections (SQLite always uses one)
    pub max_connections: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            max_connections: 2,
        }
    }
}

impl ConnectionConfig {
    /// Validates connection configuration parameters.
    ///
    /// # Errors
    /// Returns [`SchemaVizError::Configuration`] if a value is zero or out of range
    pub fn validate(&self) -> Result<()> {
        if self.connect_timeout.is_zero() {
            return Err(SchemaVizError::configuration(
                "connect_timeout must be greater than 0",
            ));
        }

        if self.max_connections == 0 {
            return Err(SchemaVizError::configuration(
                "max_connections must be greater than 0",
            ));
        }

        if self.max_connections > MAX_POOL_SIZE {
            return Err(SchemaVizError::configuration(format!(
                "max_connections should not exceed {}",
                MAX_POOL_SIZE
            )));
        }

        Ok(())
    }

    /// Builder method to set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builder method to set the pool size.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}
