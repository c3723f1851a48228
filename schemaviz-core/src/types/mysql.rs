//! MySQL type mapping.

use super::{TypeMapper, first_size, split_type};
use crate::dev_url::Dialect;
use crate::graph::{self, FieldType};
use crate::schema::{SqlType, hcl};

/// Default `varchar` length for string fields without an explicit size.
pub const DEFAULT_STRING_SIZE: u64 = 255;

/// Longest string stored as `varchar`; larger sizes become `longtext`.
const MAX_VARCHAR_SIZE: u64 = 65_535;

/// MySQL type mapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlTypes;

fn integer(name: &str, unsigned: bool) -> (SqlType, String) {
    let raw = if unsigned {
        format!("{} unsigned", name)
    } else {
        name.to_string()
    };
    (
        SqlType::Integer {
            name: name.to_string(),
            unsigned,
        },
        raw,
    )
}

impl TypeMapper for MySqlTypes {
    fn dialect(&self) -> Dialect {
        Dialect::MySQL
    }

    fn map_field(&self, column: &graph::Column) -> Option<(SqlType, String)> {
        let unsigned = column.field_type.is_unsigned();
        let mapped = match column.field_type {
            FieldType::Bool => (SqlType::Bool { name: "bool".into() }, "bool".to_string()),
            FieldType::Int8 | FieldType::Uint8 => integer("tinyint", unsigned),
            FieldType::Int16 | FieldType::Uint16 => integer("smallint", unsigned),
            FieldType::Int32 | FieldType::Uint32 => integer("int", unsigned),
            FieldType::Int | FieldType::Int64 | FieldType::Uint | FieldType::Uint64 => {
                integer("bigint", unsigned)
            }
            FieldType::Float32 => (SqlType::Float { name: "float".into() }, "float".to_string()),
            FieldType::Float64 => (
                SqlType::Float {
                    name: "double".into(),
                },
                "double".to_string(),
            ),
            FieldType::String => {
                let size = column.size.unwrap_or(DEFAULT_STRING_SIZE);
                if size > MAX_VARCHAR_SIZE {
                    (
                        SqlType::String {
                            name: "longtext".into(),
                            size: None,
                        },
                        "longtext".to_string(),
                    )
                } else {
                    (
                        SqlType::String {
                            name: "varchar".into(),
                            size: Some(size),
                        },
                        format!("varchar({})", size),
                    )
                }
            }
            FieldType::Text => (
                SqlType::String {
                    name: "longtext".into(),
                    size: None,
                },
                "longtext".to_string(),
            ),
            FieldType::Bytes => (
                SqlType::Binary {
                    name: "blob".into(),
                    size: None,
                },
                "blob".to_string(),
            ),
            FieldType::Time => (
                SqlType::Time {
                    name: "timestamp".into(),
                },
                "timestamp".to_string(),
            ),
            FieldType::Json => (SqlType::Json { name: "json".into() }, "json".to_string()),
            FieldType::Uuid => (
                SqlType::Uuid {
                    name: "char(36)".into(),
                },
                "char(36)".to_string(),
            ),
            FieldType::Enum => {
                let values = column.enum_values.clone();
                let raw = format_enum(&values);
                (SqlType::Enum { values }, raw)
            }
            FieldType::Other => return None,
        };
        Some(mapped)
    }

    fn parse_type(&self, raw: &str) -> SqlType {
        parse_mysql_type(raw)
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
            SqlType::Enum { values } => format_enum(values),
            SqlType::Unsupported { raw } => hcl::sql(raw),
        }
    }
}

/// `enum("a","b")`, the spelling used in both DDL and schema documents.
fn format_enum(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| hcl::quote(v)).collect();
    format!("enum({})", quoted.join(","))
}

/// Parses a MySQL column type such as `bigint unsigned` or `enum('a','b')`.
pub fn parse_mysql_type(raw: &str) -> SqlType {
    let lowered = raw.trim().to_lowercase();
    let (spec, unsigned) = match lowered.strip_suffix("unsigned") {
        Some(rest) => (rest.trim_end().to_string(), true),
        None => (lowered.clone(), false),
    };
    let (base, args) = split_type(&spec);

    match base.as_str() {
        "bool" | "boolean" => SqlType::Bool { name: base },
        "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" => SqlType::Integer {
            name: base,
            unsigned,
        },
        "float" | "double" | "real" => SqlType::Float { name: base },
        "decimal" | "numeric" => SqlType::Decimal {
            precision: args.first().and_then(|a| a.parse().ok()),
            scale: args.get(1).and_then(|a| a.parse().ok()),
        },
        "char" | "varchar" | "tinytext" | "text" | "mediumtext" | "longtext" => SqlType::String {
            name: base,
            size: first_size(&args),
        },
        "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob" => {
            SqlType::Binary {
                name: base,
                size: first_size(&args),
            }
        }
        "date" | "datetime" | "timestamp" | "time" | "year" => SqlType::Time { name: spec },
        "json" => SqlType::Json { name: base },
        "enum" => SqlType::Enum {
            values: args
                .iter()
                .map(|a| a.trim_matches(|c| c == '\'' || c == '"').to_string())
                .collect(),
        },
        _ => SqlType::Unsupported {
            raw: raw.trim().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Column;

    #[test]
    fn test_map_id_and_string() {
        let (sql, raw) = MySqlTypes
            .map_field(&Column::new("id", FieldType::Int))
            .unwrap();
        assert_eq!(raw, "bigint");
        assert_eq!(MySqlTypes.format_type(&sql), "bigint");

        let (sql, raw) = MySqlTypes
            .map_field(&Column::new("name", FieldType::String))
            .unwrap();
        assert_eq!(raw, "varchar(255)");
        assert_eq!(MySqlTypes.format_type(&sql), "varchar(255)");
    }

    #[test]
    fn test_map_unsigned() {
        let (sql, raw) = MySqlTypes
            .map_field(&Column::new("n", FieldType::Uint32))
            .unwrap();
        assert_eq!(raw, "int unsigned");
        assert_eq!(
            sql,
            SqlType::Integer {
                name: "int".into(),
                unsigned: true
            }
        );
        assert_eq!(MySqlTypes.format_type(&sql), "int");
    }

    #[test]
    fn test_large_strings_become_longtext() {
        let mut column = Column::new("body", FieldType::String);
        column.size = Some(1_000_000);
        let (_, raw) = MySqlTypes.map_field(&column).unwrap();
        assert_eq!(raw, "longtext");
    }

    #[test]
    fn test_enum_rendering() {
        let mut column = Column::new("role", FieldType::Enum);
        column.enum_values = vec!["admin".into(), "user".into()];
        let (sql, raw) = MySqlTypes.map_field(&column).unwrap();
        assert_eq!(raw, "enum(\"admin\",\"user\")");
        assert_eq!(MySqlTypes.format_type(&sql), "enum(\"admin\",\"user\")");
    }

    #[test]
    fn test_parse_mysql_types() {
        assert_eq!(
            parse_mysql_type("BIGINT UNSIGNED"),
            SqlType::Integer {
                name: "bigint".into(),
                unsigned: true
            }
        );
        assert_eq!(
            parse_mysql_type("enum('a','b')"),
            SqlType::Enum {
                values: vec!["a".into(), "b".into()]
            }
        );
        assert!(matches!(
            parse_mysql_type("varchar(100)"),
            SqlType::String { size: Some(100), .. }
        ));
        assert!(matches!(
            parse_mysql_type("datetime(6)"),
            SqlType::Time { .. }
        ));
        assert!(matches!(
            parse_mysql_type("point"),
            SqlType::Unsupported { .. }
        ));
    }
}
