//! PostgreSQL pool creation.

use super::PostgresDriver;
use crate::config::ConnectionConfig;
use crate::{Result, error::SchemaVizError};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use url::Url;

impl PostgresDriver {
    /// Connects to the PostgreSQL dev database named by `dev_url`.
    ///
    /// # Errors
    /// Returns an error if the URL is malformed or the server cannot be reached
    pub async fn connect(dev_url: &str, config: &ConnectionConfig) -> Result<Self> {
        let parsed = Url::parse(dev_url).map_err(|source| SchemaVizError::InvalidUrl {
            context: crate::error::redact_database_url(dev_url),
            source,
        })?;

        let redacted_url = crate::error::redact_database_url(dev_url);
        let pool = create_postgres_pool(parsed.as_str(), config).await?;
        tracing::debug!(url = %redacted_url, "Opened PostgreSQL dev database");

        Ok(Self { pool, redacted_url })
    }
}

async fn create_postgres_pool(url: &str, config: &ConnectionConfig) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .test_before_acquire(true)
        .connect(url)
        .await
        .map_err(|e| SchemaVizError::connection_failed(url, e))
}
