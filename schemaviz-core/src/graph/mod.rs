//! Entity graph: the source-schema input of the extractor.
//!
//! Entity definitions are loaded from JSON documents and flattened into a
//! [`TableSet`], the ordered table list the migration planner consumes. The
//! extractor treats a `TableSet` as read-only input.
//!
//! # Module Structure
//! - `loader`: reads entity documents from a file or directory
//! - `naming`: table and column naming rules
//! - `validation`: JSON Schema validation of entity documents

pub mod loader;
pub mod naming;
pub mod validation;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use loader::{EntityLoader, SchemaLoader, load_table_set};

/// Ordered sequence of tables produced by a [`SchemaLoader`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSet {
    pub tables: Vec<Table>,
}

impl TableSet {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// Looks a table up by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// A table definition from the entity graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    /// Primary key column names, in key order
    pub primary_key: Vec<String>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
    pub comment: Option<String>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A column definition from the entity graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub field_type: FieldType,
    /// Maximum length for string-like types
    pub size: Option<u64>,
    pub nullable: bool,
    pub unique: bool,
    /// Auto-increment / identity column
    pub increment: bool,
    pub default: Option<DefaultValue>,
    /// Allowed values for [`FieldType::Enum`]
    pub enum_values: Vec<String>,
    /// Per-dialect type overrides keyed by dialect name (`sqlite3`, `mysql`, `postgres`)
    pub schema_type: BTreeMap<String, String>,
    pub comment: Option<String>,
}

impl Column {
    /// Creates a non-null column with no extra attributes.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            size: None,
            nullable: false,
            unique: false,
            increment: false,
            default: None,
            enum_values: Vec::new(),
            schema_type: BTreeMap::new(),
            comment: None,
        }
    }
}

/// Field types understood by the entity loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    String,
    Text,
    Bytes,
    Time,
    Json,
    Uuid,
    Enum,
    /// Arbitrary type; requires a `schema_type` for the target dialect
    Other,
}

impl FieldType {
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int
                | Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Uint
                | Self::Uint8
                | Self::Uint16
                | Self::Uint32
                | Self::Uint64
        )
    }

    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            Self::Uint | Self::Uint8 | Self::Uint16 | Self::Uint32 | Self::Uint64
        )
    }
}

/// Column default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Raw SQL expression, written as `{"expr": "CURRENT_TIMESTAMP"}`
    Expr { expr: String },
}

/// Secondary index definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

/// Foreign key definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub symbol: String,
    pub columns: Vec<String>,
    pub ref_table: String,
    pub ref_columns: Vec<String>,
    pub on_update: ReferenceOption,
    pub on_delete: ReferenceOption,
}

/// Referential actions for foreign keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceOption {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferenceOption {
    /// Spelling used in schema documents (`NO_ACTION`, `SET_NULL`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoAction => "NO_ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET_NULL",
            Self::SetDefault => "SET_DEFAULT",
        }
    }
}
