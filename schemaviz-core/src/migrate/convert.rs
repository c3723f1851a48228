//! TableSet to desired-schema conversion.

use crate::dev_url::Dialect;
use crate::graph::{self, DefaultValue, FieldType, TableSet};
use crate::schema::{
    Column, Expr, ForeignKey, Identity, IdentityGeneration, Index, PrimaryKey, Table,
};
use crate::types::{self, TypeMapper};
use crate::{Result, error::SchemaVizError};

/// Table holding the type of every global id range.
pub const TYPE_TABLE: &str = "ent_types";

/// Width of the id range reserved for each table under global unique ids.
const TYPE_RANGE: u64 = 1 << 32;

/// MySQL table options applied to every generated table.
const MYSQL_CHARSET: &str = "utf8mb4";
const MYSQL_COLLATION: &str = "utf8mb4_bin";

/// Builds the desired tables for `dialect`.
///
/// With `global_unique_id`, a `type` registry table is prepended and the
/// table at position `i` starts its ids at `i << 32`.
pub fn desired_tables(
    tables: &TableSet,
    dialect: Dialect,
    global_unique_id: bool,
) -> Result<Vec<Table>> {
    let mapper = types::mapper(dialect);
    let mut out = Vec::with_capacity(tables.len().saturating_add(1));

    if global_unique_id {
        out.push(convert_table(&type_table(), dialect, mapper)?);
    }

    for (position, table) in tables.iter().enumerate() {
        let mut converted = convert_table(table, dialect, mapper)?;
        if global_unique_id {
            apply_id_range(&mut converted, position, dialect)?;
        }
        out.push(converted);
    }

    Ok(out)
}

fn type_table() -> graph::Table {
    let mut id = graph::Column::new("id", FieldType::Uint64);
    id.increment = true;
    let mut type_name = graph::Column::new("type", FieldType::String);
    type_name.unique = true;

    graph::Table {
        name: TYPE_TABLE.to_string(),
        columns: vec![id, type_name],
        primary_key: vec!["id".to_string()],
        indexes: Vec::new(),
        foreign_keys: Vec::new(),
        comment: None,
    }
}

fn apply_id_range(table: &mut Table, position: usize, dialect: Dialect) -> Result<()> {
    let start = u64::try_from(position)
        .ok()
        .and_then(|p| p.checked_mul(TYPE_RANGE))
        .ok_or_else(|| {
            SchemaVizError::schema_plan(format!("too many tables for global unique ids at {}", table.name))
        })?;

    if start == 0 {
        return Ok(());
    }

    match dialect {
        Dialect::MySQL => table.auto_increment = Some(start),
        Dialect::PostgreSQL => {
            for column in table.columns.iter_mut() {
                if let Some(identity) = column.identity.as_mut() {
                    identity.start = Some(start);
                }
            }
        }
        // SQLite has no way to seed AUTOINCREMENT in the schema itself
        Dialect::SQLite => {}
    }
    Ok(())
}

fn convert_table(table: &graph::Table, dialect: Dialect, mapper: &dyn TypeMapper) -> Result<Table> {
    let mut out = Table::new(table.name.clone());
    out.comment = table.comment.clone();

    if dialect == Dialect::MySQL {
        out.charset = Some(MYSQL_CHARSET.to_string());
        out.collation = Some(MYSQL_COLLATION.to_string());
    }

    for column in &table.columns {
        out.columns.push(convert_column(&table.name, column, dialect, mapper)?);
    }

    if !table.primary_key.is_empty() {
        out.primary_key = Some(PrimaryKey {
            columns: table.primary_key.clone(),
        });
    }

    for column in table.columns.iter().filter(|c| c.unique) {
        out.indexes.push(Index {
            name: unique_index_name(&table.name, &column.name, dialect),
            unique: true,
            columns: vec![column.name.clone()],
        });
    }
    out.indexes.extend(table.indexes.iter().map(|index| Index {
        name: index.name.clone(),
        unique: index.unique,
        columns: index.columns.clone(),
    }));

    out.foreign_keys = table
        .foreign_keys
        .iter()
        .map(|fk| ForeignKey {
            symbol: fk.symbol.clone(),
            columns: fk.columns.clone(),
            ref_table: fk.ref_table.clone(),
            ref_columns: fk.ref_columns.clone(),
            on_update: fk.on_update,
            on_delete: fk.on_delete,
        })
        .collect();

    Ok(out)
}

fn convert_column(
    table: &str,
    column: &graph::Column,
    dialect: Dialect,
    mapper: &dyn TypeMapper,
) -> Result<Column> {
    let mut out = Column::new(column.name.clone(), mapper.column_type(table, column)?);
    out.comment = column.comment.clone();
    out.default = column.default.as_ref().map(default_expr);

    if column.increment {
        match dialect {
            Dialect::PostgreSQL => {
                out.identity = Some(Identity {
                    generation: IdentityGeneration::ByDefault,
                    start: None,
                });
            }
            Dialect::SQLite | Dialect::MySQL => out.auto_increment = true,
        }
    }

    Ok(out)
}

fn default_expr(value: &DefaultValue) -> Expr {
    match value {
        DefaultValue::Bool(b) => Expr::Bool(*b),
        DefaultValue::Int(i) => Expr::Int(*i),
        DefaultValue::Float(f) => Expr::Float(*f),
        DefaultValue::String(s) => Expr::String(s.clone()),
        DefaultValue::Expr { expr } => Expr::Raw(expr.clone()),
    }
}

fn unique_index_name(table: &str, column: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::MySQL => column.to_string(),
        Dialect::SQLite | Dialect::PostgreSQL => format!("{}_{}_key", table, column),
    }
}
