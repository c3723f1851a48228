//! SQLite type mapping.
//!
//! SQLite uses a dynamic type system with type affinity. Declared types are
//! parsed with the affinity rules:
//! 1. Contains "INT" -> INTEGER affinity
//! 2. Contains "CHAR", "CLOB", or "TEXT" -> TEXT affinity
//! 3. Contains "BLOB" or no type specified -> BLOB affinity
//! 4. Contains "REAL", "FLOA", or "DOUB" -> REAL affinity
//! 5. Otherwise -> NUMERIC affinity

use super::{TypeMapper, first_size, split_type};
use crate::dev_url::Dialect;
use crate::graph::{self, FieldType};
use crate::schema::{SqlType, hcl};

/// SQLite type mapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteTypes;

impl TypeMapper for SqliteTypes {
    fn dialect(&self) -> Dialect {
        Dialect::SQLite
    }

    fn map_field(&self, column: &graph::Column) -> Option<(SqlType, String)> {
        let (sql, raw) = match column.field_type {
            FieldType::Bool => (SqlType::Bool { name: "bool".into() }, "bool"),
            t if t.is_integer() => (
                SqlType::Integer {
                    name: "integer".into(),
                    unsigned: false,
                },
                "integer",
            ),
            FieldType::Float32 | FieldType::Float64 => {
                (SqlType::Float { name: "real".into() }, "real")
            }
            FieldType::String | FieldType::Text | FieldType::Enum => (
                SqlType::String {
                    name: "text".into(),
                    size: None,
                },
                "text",
            ),
            FieldType::Bytes => (
                SqlType::Binary {
                    name: "blob".into(),
                    size: None,
                },
                "blob",
            ),
            FieldType::Time => (
                SqlType::Time {
                    name: "datetime".into(),
                },
                "datetime",
            ),
            FieldType::Json => (SqlType::Json { name: "json".into() }, "json"),
            FieldType::Uuid => (SqlType::Uuid { name: "uuid".into() }, "uuid"),
            _ => return None,
        };
        Some((sql, raw.to_string()))
    }

    fn parse_type(&self, raw: &str) -> SqlType {
        parse_sqlite_type(raw)
    }

    fn format_type(&self, sql: &SqlType) -> String {
        match sql {
            SqlType::Integer { name, .. }
            | SqlType::Float { name }
            | SqlType::Bool { name }
            | SqlType::Time { name }
            | SqlType::Json { name }
            | SqlType::Uuid { name } => name.clone(),
            SqlType::String { name, size } | SqlType::Binary { name, size } => match size {
                Some(size) => format!("{}({})", name, size),
                None => name.clone(),
            },
            SqlType::Decimal { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("decimal({},{})", p, s),
                (Some(p), None) => format!("decimal({})", p),
                _ => "decimal".to_string(),
            },
            SqlType::Enum { .. } => "text".to_string(),
            SqlType::Unsupported { raw } => hcl::sql(raw),
        }
    }
}

/// Parses a declared SQLite type using the affinity rules.
///
/// # Example
/// ```rust
/// use schemaviz_core::schema::SqlType;
/// use schemaviz_core::types::sqlite::parse_sqlite_type;
///
/// let parsed = parse_sqlite_type("VARCHAR(255)");
/// assert!(matches!(parsed, SqlType::String { size: Some(255), .. }));
/// ```
pub fn parse_sqlite_type(raw: &str) -> SqlType {
    let (base, args) = split_type(raw);
    let upper = base.to_uppercase();

    // Empty type has BLOB affinity
    if upper.is_empty() {
        return SqlType::Binary {
            name: "blob".into(),
            size: None,
        };
    }

    match upper.as_str() {
        "BOOLEAN" | "BOOL" => return SqlType::Bool { name: base },
        "DATE" | "TIME" | "DATETIME" | "TIMESTAMP" => return SqlType::Time { name: base },
        "JSON" | "JSONB" => return SqlType::Json { name: base },
        "UUID" | "GUID" => return SqlType::Uuid { name: base },
        "NUMERIC" | "DECIMAL" => {
            return SqlType::Decimal {
                precision: args.first().and_then(|a| a.parse().ok()),
                scale: args.get(1).and_then(|a| a.parse().ok()),
            };
        }
        _ => {}
    }

    if upper.contains("INT") {
        return SqlType::Integer {
            name: base,
            unsigned: false,
        };
    }

    if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
        return SqlType::String {
            name: base,
            size: first_size(&args),
        };
    }

    if upper.contains("BLOB") {
        return SqlType::Binary {
            name: base,
            size: first_size(&args),
        };
    }

    if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        return SqlType::Float { name: base };
    }

    SqlType::Unsupported {
        raw: raw.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Column;

    #[test]
    fn test_map_integer_fields() {
        for field_type in [FieldType::Int, FieldType::Int8, FieldType::Uint64] {
            let (sql, raw) = SqliteTypes
                .map_field(&Column::new("n", field_type))
                .unwrap();
            assert_eq!(raw, "integer");
            assert_eq!(SqliteTypes.format_type(&sql), "integer");
        }
    }

    #[test]
    fn test_map_string_fields_ignore_size() {
        let mut column = Column::new("name", FieldType::String);
        column.size = Some(64);
        let (sql, raw) = SqliteTypes.map_field(&column).unwrap();
        assert_eq!(raw, "text");
        assert_eq!(SqliteTypes.format_type(&sql), "text");
    }

    #[test]
    fn test_map_other_has_no_default() {
        assert!(
            SqliteTypes
                .map_field(&Column::new("x", FieldType::Other))
                .is_none()
        );
    }

    #[test]
    fn test_parse_affinity_rules() {
        assert!(matches!(
            parse_sqlite_type("BIGINT"),
            SqlType::Integer { .. }
        ));
        assert!(matches!(
            parse_sqlite_type("NVARCHAR(40)"),
            SqlType::String { size: Some(40), .. }
        ));
        assert!(matches!(
            parse_sqlite_type("DOUBLE PRECISION"),
            SqlType::Float { .. }
        ));
        assert!(matches!(
            parse_sqlite_type(""),
            SqlType::Binary { size: None, .. }
        ));
        assert!(matches!(parse_sqlite_type("boolean"), SqlType::Bool { .. }));
        assert!(matches!(
            parse_sqlite_type("decimal(10,2)"),
            SqlType::Decimal {
                precision: Some(10),
                scale: Some(2)
            }
        ));
    }

    #[test]
    fn test_unknown_types_are_kept_raw() {
        let parsed = parse_sqlite_type("geometry");
        assert_eq!(
            parsed,
            SqlType::Unsupported {
                raw: "geometry".to_string()
            }
        );
        assert_eq!(SqliteTypes.format_type(&parsed), "sql(\"geometry\")");
    }

    #[test]
    fn test_format_keeps_declared_spelling() {
        assert_eq!(
            SqliteTypes.format_type(&parse_sqlite_type("VARCHAR(255)")),
            "varchar(255)"
        );
        assert_eq!(SqliteTypes.format_type(&parse_sqlite_type("INTEGER")), "integer");
    }
}
