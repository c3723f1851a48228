//! Entity document loading.
//!
//! A schema path is either a single `.json` file or a directory of them. A
//! file holds one entity object, an array of entities, or an object with an
//! `entities` array. Entities are sorted by name before they are flattened
//! into tables, so the resulting [`TableSet`] does not depend on file order.

use super::validation::validate_entity;
use super::{Column, DefaultValue, FieldType, ForeignKey, Index, ReferenceOption, Table, TableSet};
use crate::graph::naming;
use crate::{Result, error::SchemaVizError};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Builds a [`TableSet`] from a schema definition path.
pub trait SchemaLoader: Send + Sync {
    /// Loads and flattens the entity graph found at `path`.
    ///
    /// # Errors
    /// Returns [`SchemaVizError::SchemaLoad`] on unreadable, invalid or
    /// inconsistent definitions.
    fn load(&self, path: &Path) -> Result<TableSet>;
}

/// Loader for JSON entity definition documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityLoader;

impl SchemaLoader for EntityLoader {
    fn load(&self, path: &Path) -> Result<TableSet> {
        load_table_set(path)
    }
}

#[derive(Debug, Deserialize)]
struct EntityDef {
    name: String,
    #[serde(default)]
    table: Option<String>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    id: Option<IdDef>,
    #[serde(default)]
    fields: Vec<FieldDef>,
    #[serde(default)]
    edges: Vec<EdgeDef>,
    #[serde(default)]
    indexes: Vec<IndexDef>,
}

#[derive(Debug, Deserialize)]
struct IdDef {
    #[serde(rename = "type", default = "default_id_type")]
    field_type: FieldType,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    schema_type: BTreeMap<String, String>,
}

const fn default_id_type() -> FieldType {
    FieldType::Int
}

#[derive(Debug, Deserialize)]
struct FieldDef {
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    optional: bool,
    /// Accepted for compatibility; nullability comes from `optional` alone
    #[serde(default, rename = "nillable")]
    _nillable: bool,
    #[serde(default)]
    unique: bool,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    default: Option<DefaultValue>,
    #[serde(default)]
    values: Vec<String>,
    #[serde(default)]
    schema_type: BTreeMap<String, String>,
    #[serde(default)]
    comment: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EdgeDef {
    name: String,
    to: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    unique: bool,
    #[serde(default)]
    on_delete: Option<ReferenceOption>,
}

#[derive(Debug, Deserialize)]
struct IndexDef {
    #[serde(default)]
    name: Option<String>,
    fields: Vec<String>,
    #[serde(default)]
    unique: bool,
}

/// Loads the entity graph at `path` and flattens it into tables.
///
/// # Errors
/// Returns [`SchemaVizError::SchemaLoad`] if the path cannot be read, a document
/// fails validation, or the entities reference each other inconsistently.
pub fn load_table_set(path: &Path) -> Result<TableSet> {
    let files = collect_files(path)?;
    if files.is_empty() {
        return Err(SchemaVizError::schema_load(format!(
            "no entity definitions found in {}",
            path.display()
        )));
    }

    let mut entities = Vec::new();
    for file in &files {
        entities.extend(read_entities(file)?);
    }

    tracing::debug!(
        "Loaded {} entities from {} files",
        entities.len(),
        files.len()
    );

    build_tables(entities)
}

fn collect_files(path: &Path) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        SchemaVizError::schema_load_with(format!("reading {}", path.display()), e)
    })?;

    if metadata.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = std::fs::read_dir(path).map_err(|e| {
        SchemaVizError::schema_load_with(format!("listing {}", path.display()), e)
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            SchemaVizError::schema_load_with(format!("listing {}", path.display()), e)
        })?;
        let candidate = entry.path();
        if candidate.is_file() && candidate.extension().is_some_and(|ext| ext == "json") {
            files.push(candidate);
        }
    }
    files.sort();

    Ok(files)
}

fn read_entities(file: &Path) -> Result<Vec<EntityDef>> {
    let raw = std::fs::read_to_string(file).map_err(|e| {
        SchemaVizError::schema_load_with(format!("reading {}", file.display()), e)
    })?;
    let document: Value = serde_json::from_str(&raw).map_err(|e| {
        SchemaVizError::schema_load_with(format!("parsing {}", file.display()), e)
    })?;

    let values = match document {
        Value::Array(items) => items,
        Value::Object(mut obj) if obj.contains_key("entities") => {
            match obj.remove("entities") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(SchemaVizError::schema_load(format!(
                        "{}: `entities` must be an array",
                        file.display()
                    )));
                }
            }
        }
        other => vec![other],
    };

    values
        .into_iter()
        .map(|value| {
            validate_entity(&value).map_err(|e| {
                SchemaVizError::schema_load_with(format!("validating {}", file.display()), e)
            })?;
            serde_json::from_value::<EntityDef>(value).map_err(|e| {
                SchemaVizError::schema_load_with(format!("decoding {}", file.display()), e)
            })
        })
        .collect()
}

/// Resolved identity of an entity, needed before edges can be wired.
struct EntityRef {
    table: String,
    id: Column,
}

fn build_tables(mut entities: Vec<EntityDef>) -> Result<TableSet> {
    entities.sort_by(|a, b| a.name.cmp(&b.name));

    let mut refs: HashMap<String, EntityRef> = HashMap::new();
    let mut table_names = HashSet::new();
    for entity in &entities {
        let table = entity
            .table
            .clone()
            .unwrap_or_else(|| naming::table_name(&entity.name));
        if !table_names.insert(table.clone()) {
            return Err(SchemaVizError::schema_load(format!(
                "table {} is defined more than once",
                table
            )));
        }
        let id = id_column(entity.id.as_ref());
        if refs
            .insert(entity.name.clone(), EntityRef { table, id })
            .is_some()
        {
            return Err(SchemaVizError::schema_load(format!(
                "entity {} is defined more than once",
                entity.name
            )));
        }
    }

    let mut tables = Vec::with_capacity(entities.len());
    for entity in entities {
        tables.push(build_table(entity, &refs)?);
    }

    Ok(TableSet::new(tables))
}

fn id_column(def: Option<&IdDef>) -> Column {
    let (field_type, size, schema_type) = match def {
        Some(d) => (d.field_type, d.size, d.schema_type.clone()),
        None => (FieldType::Int, None, BTreeMap::new()),
    };

    let mut column = Column::new("id", field_type);
    column.size = size;
    column.schema_type = schema_type;
    column.increment = field_type.is_integer();
    column
}

fn build_table(entity: EntityDef, refs: &HashMap<String, EntityRef>) -> Result<Table> {
    let this = refs
        .get(&entity.name)
        .ok_or_else(|| SchemaVizError::schema_load(format!("unknown entity {}", entity.name)))?;
    let table_name = this.table.clone();

    let mut columns = vec![this.id.clone()];
    let mut edge_columns: HashMap<String, String> = HashMap::new();
    let mut foreign_keys = Vec::new();

    for field in entity.fields {
        if field.field_type == FieldType::Enum && field.values.is_empty() {
            return Err(SchemaVizError::schema_load(format!(
                "{}.{}: enum fields need at least one value",
                table_name, field.name
            )));
        }
        let mut column = Column::new(field.name, field.field_type);
        column.nullable = field.optional;
        column.unique = field.unique;
        column.size = field.size;
        column.default = field.default;
        column.enum_values = field.values;
        column.schema_type = field.schema_type;
        column.comment = field.comment;
        columns.push(column);
    }

    for edge in entity.edges {
        let target = refs.get(&edge.to).ok_or_else(|| {
            SchemaVizError::schema_load(format!(
                "{}: edge {} references unknown entity {}",
                table_name, edge.name, edge.to
            ))
        })?;

        let column_name = naming::edge_column(&edge.name);
        let mut column = Column::new(column_name.clone(), target.id.field_type);
        column.size = target.id.size;
        column.schema_type = target.id.schema_type.clone();
        column.nullable = !edge.required;
        column.unique = edge.unique;
        columns.push(column);

        let default_action = if edge.required {
            ReferenceOption::NoAction
        } else {
            ReferenceOption::SetNull
        };
        foreign_keys.push(ForeignKey {
            symbol: naming::foreign_key_symbol(&table_name, &target.table, &edge.name),
            columns: vec![column_name.clone()],
            ref_table: target.table.clone(),
            ref_columns: vec![target.id.name.clone()],
            on_update: ReferenceOption::NoAction,
            on_delete: edge.on_delete.unwrap_or(default_action),
        });
        edge_columns.insert(edge.name, column_name);
    }

    let mut seen = HashSet::new();
    for column in &columns {
        if !seen.insert(column.name.as_str()) {
            return Err(SchemaVizError::schema_load(format!(
                "{}: duplicate column {}",
                table_name, column.name
            )));
        }
    }

    let mut indexes = Vec::with_capacity(entity.indexes.len());
    for def in entity.indexes {
        let mut index_columns = Vec::with_capacity(def.fields.len());
        for field in def.fields {
            let resolved = edge_columns.get(&field).cloned().unwrap_or(field);
            if !seen.contains(resolved.as_str()) {
                return Err(SchemaVizError::schema_load(format!(
                    "{}: index references unknown column {}",
                    table_name, resolved
                )));
            }
            index_columns.push(resolved);
        }
        indexes.push(Index {
            name: def
                .name
                .unwrap_or_else(|| naming::index_name(&table_name, &index_columns)),
            columns: index_columns,
            unique: def.unique,
        });
    }

    Ok(Table {
        name: table_name,
        columns,
        primary_key: vec![this.id.name.clone()],
        indexes,
        foreign_keys,
        comment: entity.comment,
    })
}
