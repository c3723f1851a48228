//! PostgreSQL type mapping.
//!
//! Multi-word type names are spelled with underscores in schema documents
//! (`character varying` -> `character_varying`), and the timestamp family uses
//! the short `timestamptz`/`timetz` names.

use super::{TypeMapper, first_size, split_type};
use crate::dev_url::Dialect;
use crate::graph::{self, FieldType};
use crate::schema::{SqlType, hcl};

/// PostgreSQL type mapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresTypes;

fn named(name: &str) -> String {
    name.to_string()
}

impl TypeMapper for PostgresTypes {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSQL
    }

    fn map_field(&self, column: &graph::Column) -> Option<(SqlType, String)> {
        let integer = |name: &str| {
            (
                SqlType::Integer {
                    name: named(name),
                    unsigned: false,
                },
                named(name),
            )
        };

        let mapped = match column.field_type {
            FieldType::Bool => (
                SqlType::Bool {
                    name: named("boolean"),
                },
                named("boolean"),
            ),
            FieldType::Int8 | FieldType::Int16 | FieldType::Uint8 => integer("smallint"),
            FieldType::Int32 | FieldType::Uint16 => integer("integer"),
            FieldType::Int
            | FieldType::Int64
            | FieldType::Uint
            | FieldType::Uint32
            | FieldType::Uint64 => integer("bigint"),
            FieldType::Float32 => (SqlType::Float { name: named("real") }, named("real")),
            FieldType::Float64 => (
                SqlType::Float {
                    name: named("double precision"),
                },
                named("double precision"),
            ),
            FieldType::String | FieldType::Enum => {
                let raw = match column.size {
                    Some(size) => format!("character varying({})", size),
                    None => named("character varying"),
                };
                (
                    SqlType::String {
                        name: named("character varying"),
                        size: column.size,
                    },
                    raw,
                )
            }
            FieldType::Text => (
                SqlType::String {
                    name: named("text"),
                    size: None,
                },
                named("text"),
            ),
            FieldType::Bytes => (
                SqlType::Binary {
                    name: named("bytea"),
                    size: None,
                },
                named("bytea"),
            ),
            FieldType::Time => (
                SqlType::Time {
                    name: named("timestamp with time zone"),
                },
                named("timestamp with time zone"),
            ),
            FieldType::Json => (SqlType::Json { name: named("jsonb") }, named("jsonb")),
            FieldType::Uuid => (SqlType::Uuid { name: named("uuid") }, named("uuid")),
            FieldType::Other => return None,
        };
        Some(mapped)
    }

    fn parse_type(&self, raw: &str) -> SqlType {
        parse_postgres_type(raw)
    }

    fn format_type(&self, sql: &SqlType) -> String {
        match sql {
            SqlType::Integer { name, .. }
            | SqlType::Float { name }
            | SqlType::Bool { name }
            | SqlType::Time { name }
            | SqlType::Json { name }
            | SqlType::Uuid { name } => document_name(name),
            SqlType::String { name, size } | SqlType::Binary { name, size } => match size {
                Some(size) => format!("{}({})", document_name(name), size),
                None => document_name(name),
            },
            SqlType::Decimal { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("numeric({},{})", p, s),
                (Some(p), None) => format!("numeric({})", p),
                _ => "numeric".to_string(),
            },
            // Enum fields are stored as character varying
            SqlType::Enum { .. } => "character_varying".to_string(),
            SqlType::Unsupported { raw } => hcl::sql(raw),
        }
    }
}

/// Spelling of a type name inside a schema document.
fn document_name(name: &str) -> String {
    match name {
        "timestamp with time zone" => "timestamptz".to_string(),
        "timestamp without time zone" => "timestamp".to_string(),
        "time with time zone" => "timetz".to_string(),
        "time without time zone" => "time".to_string(),
        other => other.replace(' ', "_"),
    }
}

/// Parses a PostgreSQL type, folding the common aliases (`int4`, `varchar`, ...).
pub fn parse_postgres_type(raw: &str) -> SqlType {
    let (base, args) = split_type(raw);
    let integer = |name: &str| SqlType::Integer {
        name: named(name),
        unsigned: false,
    };

    match base.as_str() {
        "smallint" | "int2" | "smallserial" => integer("smallint"),
        "integer" | "int" | "int4" | "serial" => integer("integer"),
        "bigint" | "int8" | "bigserial" => integer("bigint"),
        "boolean" | "bool" => SqlType::Bool {
            name: named("boolean"),
        },
        "real" | "float4" => SqlType::Float { name: named("real") },
        "double precision" | "float8" => SqlType::Float {
            name: named("double precision"),
        },
        "numeric" | "decimal" => SqlType::Decimal {
            precision: args.first().and_then(|a| a.parse().ok()),
            scale: args.get(1).and_then(|a| a.parse().ok()),
        },
        "character varying" | "varchar" => SqlType::String {
            name: named("character varying"),
            size: first_size(&args),
        },
        "character" | "char" => SqlType::String {
            name: named("character"),
            size: first_size(&args),
        },
        "text" => SqlType::String {
            name: named("text"),
            size: None,
        },
        "bytea" => SqlType::Binary {
            name: named("bytea"),
            size: None,
        },
        "timestamptz" | "timestamp with time zone" => SqlType::Time {
            name: named("timestamp with time zone"),
        },
        "timestamp" | "timestamp without time zone" => SqlType::Time {
            name: named("timestamp without time zone"),
        },
        "date" => SqlType::Time { name: named("date") },
        "time" | "time without time zone" => SqlType::Time {
            name: named("time without time zone"),
        },
        "timetz" | "time with time zone" => SqlType::Time {
            name: named("time with time zone"),
        },
        "json" | "jsonb" => SqlType::Json { name: base },
        "uuid" => SqlType::Uuid { name: base },
        _ => SqlType::Unsupported {
            raw: raw.trim().to_string(),
        },
    }
}
