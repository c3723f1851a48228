//! Schema document marshaling.
//!
//! Produces the HCL form of a [`Schema`]: one `table` block per table in
//! schema order, followed by the `schema` block. Output is a pure function of
//! the input so repeated runs over the same schema are byte-identical.

use crate::dev_url::Dialect;
use crate::schema::hcl::{self, Block};
use crate::schema::{Column, Expr, ForeignKey, Index, Schema, Table};
use crate::types::{self, TypeMapper};
use crate::{Result, error::SchemaVizError};

/// Marshals `schema` into an HCL document for `dialect`.
///
/// # Errors
/// Returns [`SchemaVizError::Marshal`] if a key references a missing column or
/// a foreign key references a missing table
pub fn marshal_schema(schema: &Schema, dialect: Dialect) -> Result<Vec<u8>> {
    let mapper = types::mapper(dialect);
    let mut blocks = Vec::with_capacity(schema.tables.len().saturating_add(1));

    for table in &schema.tables {
        blocks.push(table_block(schema, table, dialect, mapper)?);
    }
    blocks.push(schema_block(schema, dialect));

    Ok(hcl::write_document(&blocks).into_bytes())
}

fn schema_block(schema: &Schema, dialect: Dialect) -> Block {
    let mut block = Block::labelled("schema", schema.name.clone());
    if dialect == Dialect::MySQL {
        if let Some(charset) = &schema.charset {
            block.attr("charset", hcl::quote(charset));
        }
        if let Some(collation) = &schema.collation {
            block.attr("collate", hcl::quote(collation));
        }
    }
    block
}

fn table_block(
    schema: &Schema,
    table: &Table,
    dialect: Dialect,
    mapper: &dyn TypeMapper,
) -> Result<Block> {
    let mut block = Block::labelled("table", table.name.clone());
    block.attr("schema", hcl::reference("schema", &schema.name));

    if dialect == Dialect::MySQL {
        // Table options equal to the schema defaults are implied
        if let Some(charset) = table.charset.as_ref().filter(|c| Some(*c) != schema.charset.as_ref()) {
            block.attr("charset", hcl::quote(charset));
        }
        if let Some(collation) = table
            .collation
            .as_ref()
            .filter(|c| Some(*c) != schema.collation.as_ref())
        {
            block.attr("collate", hcl::quote(collation));
        }
    }
    if let Some(comment) = &table.comment {
        block.attr("comment", hcl::quote(comment));
    }
    if dialect == Dialect::MySQL
        && let Some(start) = table.auto_increment
    {
        block.attr("auto_increment", start.to_string());
    }

    for column in &table.columns {
        block.block(column_block(column, dialect, mapper));
    }

    if let Some(pk) = &table.primary_key {
        check_columns(table, &pk.columns, "primary key")?;
        let mut pk_block = Block::new("primary_key");
        pk_block.attr("columns", column_refs(&pk.columns));
        block.block(pk_block);
    }

    for fk in &table.foreign_keys {
        block.block(foreign_key_block(schema, table, fk)?);
    }

    for index in &table.indexes {
        block.block(index_block(table, index)?);
    }

    Ok(block)
}

fn column_block(column: &Column, dialect: Dialect, mapper: &dyn TypeMapper) -> Block {
    let mut block = Block::labelled("column", column.name.clone());
    block
        .attr("null", column.column_type.null.to_string())
        .attr("type", mapper.format_type(&column.column_type.sql));

    if dialect == Dialect::MySQL
        && let crate::schema::SqlType::Integer { unsigned: true, .. } = column.column_type.sql
    {
        block.attr("unsigned", "true");
    }
    if let Some(default) = &column.default {
        block.attr("default", expr(default));
    }
    if let Some(comment) = &column.comment {
        block.attr("comment", hcl::quote(comment));
    }
    if column.auto_increment && dialect != Dialect::PostgreSQL {
        block.attr("auto_increment", "true");
    }
    if let Some(identity) = &column.identity {
        let mut identity_block = Block::new("identity");
        identity_block.attr("generated", identity.generation.as_str());
        if let Some(start) = identity.start {
            identity_block.attr("start", start.to_string());
        }
        block.block(identity_block);
    }

    block
}

fn foreign_key_block(schema: &Schema, table: &Table, fk: &ForeignKey) -> Result<Block> {
    check_columns(table, &fk.columns, &format!("foreign key {}", fk.symbol))?;

    let ref_table = schema.table(&fk.ref_table).ok_or_else(|| {
        SchemaVizError::marshal(format!(
            "foreign key {} on {} references missing table {}",
            fk.symbol, table.name, fk.ref_table
        ))
    })?;
    check_columns(ref_table, &fk.ref_columns, &format!("foreign key {}", fk.symbol))?;

    let ref_columns: Vec<String> = fk
        .ref_columns
        .iter()
        .map(|c| {
            format!(
                "{}.{}",
                hcl::reference("table", &ref_table.name),
                hcl::reference("column", c)
            )
        })
        .collect();

    let mut block = Block::labelled("foreign_key", fk.symbol.clone());
    block
        .attr("columns", column_refs(&fk.columns))
        .attr("ref_columns", hcl::list(ref_columns))
        .attr("on_update", fk.on_update.as_str())
        .attr("on_delete", fk.on_delete.as_str());
    Ok(block)
}

fn index_block(table: &Table, index: &Index) -> Result<Block> {
    check_columns(table, &index.columns, &format!("index {}", index.name))?;

    let mut block = Block::labelled("index", index.name.clone());
    if index.unique {
        block.attr("unique", "true");
    }
    block.attr("columns", column_refs(&index.columns));
    Ok(block)
}

fn check_columns(table: &Table, columns: &[String], what: &str) -> Result<()> {
    if columns.is_empty() {
        return Err(SchemaVizError::marshal(format!(
            "{} on {} has no columns",
            what, table.name
        )));
    }
    match columns.iter().find(|c| table.column(c).is_none()) {
        Some(missing) => Err(SchemaVizError::marshal(format!(
            "{} on {} references missing column {}",
            what, table.name, missing
        ))),
        None => Ok(()),
    }
}

fn column_refs(columns: &[String]) -> String {
    hcl::list(columns.iter().map(|c| hcl::reference("column", c)))
}

fn expr(value: &Expr) -> String {
    match value {
        Expr::Bool(b) => b.to_string(),
        Expr::Int(i) => i.to_string(),
        Expr::Float(f) => f.to_string(),
        Expr::String(s) => hcl::quote(s),
        Expr::Raw(raw) => hcl::sql(raw),
    }
}
