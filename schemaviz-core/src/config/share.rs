//! Share client configuration.

use crate::share::Transport;
use crate::{Result, error::SchemaVizError};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// GraphQL endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://gh.atlasgo.cloud/api/query";

/// Per-request timeout used when none is configured.
pub const DEFAULT_SHARE_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for publishing a schema document.
///
/// `transport` replaces the default HTTP client; tests use it to record
/// requests without touching the network.
///
/// # Example
/// ```rust
/// use schemaviz_core::config::ShareConfig;
/// use std::time::Duration;
///
/// let config = ShareConfig::default()
///     .with_endpoint("http://localhost:8080/api/query")
///     .with_timeout(Duration::from_secs(5));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct ShareConfig {
    /// GraphQL endpoint; its scheme and host also build the explore URL
    pub endpoint: String,
    /// Timeout applied to each request
    pub timeout: Duration,
    /// Optional transport override
    pub transport: Option<Arc<dyn Transport>>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_SHARE_TIMEOUT,
            transport: None,
        }
    }
}

impl fmt::Debug for ShareConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShareConfig")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

impl ShareConfig {
    /// Sets the GraphQL endpoint; the link is built from its host.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Uses `transport` instead of the default HTTP client.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Parses and checks the endpoint.
    ///
    /// # Errors
    /// Returns [`SchemaVizError::Configuration`] if the endpoint is not an
    /// absolute http(s) URL with a host, or the timeout is zero
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            SchemaVizError::configuration(format!("invalid endpoint {:?}: {}", self.endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(SchemaVizError::configuration(format!(
                "endpoint must use http or https, got {}",
                url.scheme()
            )));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(SchemaVizError::configuration("endpoint has no host"));
        }

        Ok(url)
    }

    /// Validates the configuration without building a client.
    ///
    /// # Errors
    /// See [`ShareConfig::endpoint_url`]
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(SchemaVizError::configuration("timeout must be greater than 0"));
        }
        self.endpoint_url().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShareConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.transport.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_endpoints() {
        for endpoint in ["not a url", "ftp://example.com/api", "mailto:someone@example.com"] {
            let config = ShareConfig::default().with_endpoint(endpoint);
            let err = config.validate().unwrap_err();
            assert!(
                matches!(err, SchemaVizError::Configuration { .. }),
                "{endpoint}: {err}"
            );
        }
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = ShareConfig::default().with_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_hides_transport() {
        let rendered = format!("{:?}", ShareConfig::default());
        assert!(rendered.contains("custom_transport: false"));
    }
}
