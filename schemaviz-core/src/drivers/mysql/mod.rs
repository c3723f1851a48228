//! MySQL driver.
//!
//! # Module Structure
//! - `connection`: Pool creation from a `mysql://` dev URL
//!
//! # MySQL-Specific Features
//! - The inspected schema is the database named in the URL (`SELECT DATABASE()`)
//! - Normalization resolves the database default charset and collation from
//!   `information_schema.SCHEMATA`

pub mod connection;

use super::{Driver, DriverFeature};
use crate::dev_url::Dialect;
use crate::schema::{Schema, Table};
use crate::{Result, error::SchemaVizError};
use async_trait::async_trait;
use sqlx::MySqlPool;

/// MySQL dev database driver.
pub struct MySqlDriver {
    pool: MySqlPool,
    redacted_url: String,
}

impl std::fmt::Debug for MySqlDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlDriver")
            .field("url", &self.redacted_url)
            .finish_non_exhaustive()
    }
}

/// Database defaults read from `information_schema.SCHEMATA`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SchemaDefaults {
    charset: String,
    collation: String,
}

impl MySqlDriver {
    /// Underlying pool, for callers that need to prepare the dev database.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    fn query_failed(&self, e: sqlx::Error) -> SchemaVizError {
        SchemaVizError::connection_failed(&self.redacted_url, e)
    }

    async fn current_database(&self) -> Result<String> {
        let name: Option<String> = sqlx::query_scalar("SELECT DATABASE()")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| self.query_failed(e))?;

        name.ok_or_else(|| SchemaVizError::configuration("MySQL connection has no default database"))
    }

    async fn schema_defaults(&self, database: &str) -> Result<SchemaDefaults> {
        let row: Option<(String, String)> = sqlx::query_as(
            "SELECT CAST(DEFAULT_CHARACTER_SET_NAME AS CHAR), CAST(DEFAULT_COLLATION_NAME AS CHAR) \
             FROM information_schema.SCHEMATA WHERE SCHEMA_NAME = ?",
        )
        .bind(database)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| self.query_failed(e))?;

        let (charset, collation) = row.ok_or_else(|| {
            SchemaVizError::configuration(format!("database {} does not exist", database))
        })?;
        Ok(SchemaDefaults { charset, collation })
    }

    async fn table_names(&self, database: &str) -> Result<Vec<String>> {
        sqlx::query_scalar(
            "SELECT CAST(TABLE_NAME AS CHAR) FROM information_schema.TABLES \
             WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE' ORDER BY TABLE_NAME",
        )
        .bind(database)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| self.query_failed(e))
    }
}

#[async_trait]
impl Driver for MySqlDriver {
    fn dialect(&self) -> Dialect {
        Dialect::MySQL
    }

    fn supports_feature(&self, feature: DriverFeature) -> bool {
        matches!(feature, DriverFeature::Inspect | DriverFeature::Normalize)
    }

    async fn inspect_schema(&self) -> Result<Schema> {
        let database = self.current_database().await?;
        let defaults = self.schema_defaults(&database).await?;

        let mut schema = Schema::new(database.clone());
        schema.charset = Some(defaults.charset);
        schema.collation = Some(defaults.collation);
        schema.tables = self
            .table_names(&database)
            .await?
            .into_iter()
            .map(Table::new)
            .collect();

        tracing::debug!(
            database = %database,
            tables = schema.tables.len(),
            "Inspected MySQL schema"
        );
        Ok(schema)
    }

    async fn normalize_schema(&self, mut schema: Schema) -> Result<Schema> {
        let defaults = self
            .schema_defaults(&schema.name)
            .await
            .map_err(|e| SchemaVizError::normalize_failed(format!("schema {}", schema.name), e))?;

        tracing::debug!(
            charset = %defaults.charset,
            collation = %defaults.collation,
            "Resolved MySQL schema defaults"
        );

        for table in &mut schema.tables {
            if table.charset.is_none() {
                table.charset = Some(defaults.charset.clone());
            }
            if table.collation.is_none() {
                table.collation = Some(defaults.collation.clone());
            }
        }
        schema.charset = Some(defaults.charset);
        schema.collation = Some(defaults.collation);

        Ok(schema)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
