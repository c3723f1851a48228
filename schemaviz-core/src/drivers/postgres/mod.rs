//! PostgreSQL driver.
//!
//! # Module Structure
//! - `connection`: Pool creation from a `postgres://` dev URL
//!
//! The inspected schema is `current_schema()`, normally `public`. PostgreSQL
//! needs no normalization pass.

pub mod connection;

use super::{Driver, DriverFeature};
use crate::dev_url::Dialect;
use crate::schema::{Schema, Table};
use crate::{Result, error::SchemaVizError};
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL dev database driver.
pub struct PostgresDriver {
    pool: PgPool,
    redacted_url: String,
}

impl std::fmt::Debug for PostgresDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresDriver")
            .field("url", &self.redacted_url)
            .finish_non_exhaustive()
    }
}

impl PostgresDriver {
    /// Underlying pool, for callers that need to prepare the dev database.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn query_failed(&self, e: sqlx::Error) -> SchemaVizError {
        SchemaVizError::connection_failed(&self.redacted_url, e)
    }
}

#[async_trait]
impl Driver for PostgresDriver {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSQL
    }

    fn supports_feature(&self, feature: DriverFeature) -> bool {
        matches!(feature, DriverFeature::Inspect)
    }

    async fn inspect_schema(&self) -> Result<Schema> {
        let name: String = sqlx::query_scalar("SELECT current_schema()::text")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| self.query_failed(e))?;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT table_name::text FROM information_schema.tables \
             WHERE table_schema = $1 AND table_type = 'BASE TABLE' ORDER BY table_name",
        )
        .bind(&name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| self.query_failed(e))?;

        let mut schema = Schema::new(name);
        schema.tables = tables.into_iter().map(Table::new).collect();
        tracing::debug!(
            schema = %schema.name,
            tables = schema.tables.len(),
            "Inspected PostgreSQL schema"
        );
        Ok(schema)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
