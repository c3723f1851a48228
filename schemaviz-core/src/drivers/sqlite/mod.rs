//! SQLite driver.
//!
//! # Module Structure
//! - `connection`: Dev URL translation and single-connection pools
//!
//! Inspection reads `sqlite_master` and `pragma_table_info`. SQLite has no
//! server-side defaults worth resolving, so the driver does not normalize.

pub mod connection;

#[cfg(test)]
mod tests;

use super::{Driver, DriverFeature};
use crate::dev_url::Dialect;
use crate::schema::{Column, ColumnType, PrimaryKey, Schema, Table};
use crate::types::sqlite::parse_sqlite_type;
use crate::{Result, error::SchemaVizError};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub use connection::{SqliteTarget, translate_dev_url};

/// Name SQLite gives the primary database of a connection.
pub const MAIN_SCHEMA: &str = "main";

/// SQLite dev database driver.
pub struct SqliteDriver {
    pool: SqlitePool,
    target: SqliteTarget,
}

impl std::fmt::Debug for SqliteDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDriver")
            .field("in_memory", &self.target.is_in_memory())
            .field("foreign_keys", &self.target.foreign_keys)
            .finish_non_exhaustive()
    }
}

impl SqliteDriver {
    /// Underlying pool, for callers that need to prepare the dev database.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn table_names(&self) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SchemaVizError::connection_failed(&self.target.url, e))
    }

    async fn inspect_table(&self, name: &str) -> Result<Table> {
        let rows = sqlx::query(
            r#"SELECT name, type, "notnull", pk FROM pragma_table_info(?) ORDER BY cid"#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SchemaVizError::connection_failed(&self.target.url, e))?;

        let mut table = Table::new(name);
        let mut pk: Vec<(i64, String)> = Vec::new();

        for row in rows {
            let column_name: String = row
                .try_get("name")
                .map_err(|e| SchemaVizError::connection_failed(&self.target.url, e))?;
            let raw: String = row.try_get("type").unwrap_or_default();
            let not_null: i64 = row.try_get("notnull").unwrap_or(0);
            let pk_position: i64 = row.try_get("pk").unwrap_or(0);

            if pk_position > 0 {
                pk.push((pk_position, column_name.clone()));
            }

            table.columns.push(Column::new(
                column_name,
                ColumnType {
                    sql: parse_sqlite_type(&raw),
                    raw,
                    null: not_null == 0,
                },
            ));
        }

        if !pk.is_empty() {
            pk.sort();
            table.primary_key = Some(PrimaryKey {
                columns: pk.into_iter().map(|(_, c)| c).collect(),
            });
        }

        Ok(table)
    }
}

#[async_trait]
impl Driver for SqliteDriver {
    fn dialect(&self) -> Dialect {
        Dialect::SQLite
    }

    fn supports_feature(&self, feature: DriverFeature) -> bool {
        matches!(feature, DriverFeature::Inspect)
    }

    async fn inspect_schema(&self) -> Result<Schema> {
        let mut schema = Schema::new(MAIN_SCHEMA);
        for name in self.table_names().await? {
            schema.tables.push(self.inspect_table(&name).await?);
        }
        tracing::debug!(tables = schema.tables.len(), "Inspected SQLite schema");
        Ok(schema)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
