//! Per-dialect type mapping.
//!
//! Each dialect maps entity field types to SQL column types for the planner,
//! parses raw `schema_type` overrides, and formats types for schema documents.
//!
//! # Module Structure
//! - `sqlite`: affinity-based SQLite types
//! - `mysql`: MySQL types, including `unsigned` and `enum(...)`
//! - `postgres`: PostgreSQL types and their document spellings

pub mod mysql;
pub mod postgres;
pub mod sqlite;

use crate::dev_url::Dialect;
use crate::graph;
use crate::schema::{ColumnType, SqlType};
use crate::{Result, error::SchemaVizError};

/// Dialect-specific type conversions.
pub trait TypeMapper: Send + Sync {
    /// Dialect this mapper belongs to.
    fn dialect(&self) -> Dialect;

    /// Maps an entity field type to a SQL type and its raw spelling.
    ///
    /// Returns `None` for types the dialect has no default mapping for
    /// ([`graph::FieldType::Other`]).
    fn map_field(&self, column: &graph::Column) -> Option<(SqlType, String)>;

    /// Parses a raw SQL type such as `VARCHAR(255)`.
    fn parse_type(&self, raw: &str) -> SqlType;

    /// Formats a type as a schema document expression.
    fn format_type(&self, sql: &SqlType) -> String;

    /// Resolves the column type of `column`, honoring `schema_type` overrides.
    ///
    /// # Errors
    /// Returns [`SchemaVizError::SchemaPlan`] when the column has no mapping
    /// and no override for this dialect.
    fn column_type(&self, table: &str, column: &graph::Column) -> Result<ColumnType> {
        if let Some(raw) = column.schema_type.get(self.dialect().name()) {
            return Ok(ColumnType {
                sql: self.parse_type(raw),
                raw: raw.clone(),
                null: column.nullable,
            });
        }

        let (sql, raw) = self.map_field(column).ok_or_else(|| {
            SchemaVizError::schema_plan(format!(
                "{}.{}: unsupported type {:?}, missing schema type for dialect {}",
                table,
                column.name,
                column.field_type,
                self.dialect().name()
            ))
        })?;

        Ok(ColumnType {
            sql,
            raw,
            null: column.nullable,
        })
    }
}

/// Returns the type mapper for `dialect`.
pub fn mapper(dialect: Dialect) -> &'static dyn TypeMapper {
    match dialect {
        Dialect::SQLite => &sqlite::SqliteTypes,
        Dialect::MySQL => &mysql::MySqlTypes,
        Dialect::PostgreSQL => &postgres::PostgresTypes,
    }
}

/// Splits `NAME(args)` into the lowercased base name and the argument list.
pub(crate) fn split_type(raw: &str) -> (String, Vec<String>) {
    let trimmed = raw.trim();
    match (trimmed.find('('), trimmed.rfind(')')) {
        (Some(open), Some(close)) if close > open => {
            let base = trimmed[..open].trim().to_lowercase();
            let args = trimmed[open.saturating_add(1)..close]
                .split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect();
            (base, args)
        }
        _ => (trimmed.to_lowercase(), Vec::new()),
    }
}

/// Parses the first type argument as a length.
pub(crate) fn first_size(args: &[String]) -> Option<u64> {
    args.first().and_then(|a| a.parse().ok())
}
