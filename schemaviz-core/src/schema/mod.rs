//! Desired-schema model.
//!
//! This is the fully resolved structure the migration planner computes before
//! producing a change set, and the structure drivers inspect, normalize and
//! marshal. It is dialect-aware: column types carry both the raw SQL type and
//! a structured [`SqlType`].

pub mod hcl;

pub use crate::graph::ReferenceOption;

/// A database schema (or SQLite/MySQL "database") with its tables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    /// Schema name (`main` for SQLite)
    pub name: String,
    /// Default character set (MySQL)
    pub charset: Option<String>,
    /// Default collation (MySQL)
    pub collation: Option<String>,
    /// Tables in planner order
    pub tables: Vec<Table>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Looks a table up by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// A table in the desired schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Table name
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<Column>,
    /// Primary key, if any
    pub primary_key: Option<PrimaryKey>,
    /// Secondary indexes
    pub indexes: Vec<Index>,
    /// Foreign keys
    pub foreign_keys: Vec<ForeignKey>,
    /// Table character set (MySQL)
    pub charset: Option<String>,
    /// Table collation (MySQL)
    pub collation: Option<String>,
    /// Table comment
    pub comment: Option<String>,
    /// Initial AUTO_INCREMENT value (MySQL)
    pub auto_increment: Option<u64>,
}

impl Table {
    /// Creates a table with no columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Looks a column up by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A column in the desired schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Type and nullability
    pub column_type: ColumnType,
    /// Default value
    pub default: Option<Expr>,
    /// Column comment
    pub comment: Option<String>,
    /// `AUTO_INCREMENT` (MySQL) / `AUTOINCREMENT` (SQLite)
    pub auto_increment: bool,
    /// Identity column (PostgreSQL)
    pub identity: Option<Identity>,
}

impl Column {
    /// Creates a column with no default, comment or identity.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            default: None,
            comment: None,
            auto_increment: false,
            identity: None,
        }
    }
}

/// Column type: the structured type, the raw SQL spelling and nullability.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnType {
    /// Structured type
    pub sql: SqlType,
    /// SQL spelling as the dialect writes it
    pub raw: String,
    /// Whether the column accepts NULL
    pub null: bool,
}

/// Structured SQL type.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlType {
    /// Integer type, e.g. `bigint`
    Integer {
        /// Type name
        name: String,
        /// `UNSIGNED` (MySQL)
        unsigned: bool,
    },
    /// Floating point type
    Float {
        /// Type name
        name: String,
    },
    /// Fixed point decimal
    Decimal {
        /// Total digits
        precision: Option<u32>,
        /// Digits after the point
        scale: Option<u32>,
    },
    /// Boolean type
    Bool {
        /// Type name
        name: String,
    },
    /// Character type, sized or not
    String {
        /// Type name
        name: String,
        /// Length limit
        size: Option<u64>,
    },
    /// Binary type, sized or not
    Binary {
        /// Type name
        name: String,
        /// Length limit
        size: Option<u64>,
    },
    /// Date or time type
    Time {
        /// Type name
        name: String,
    },
    /// JSON type
    Json {
        /// Type name
        name: String,
    },
    /// UUID type
    Uuid {
        /// Type name
        name: String,
    },
    /// Enumeration of the given values
    Enum {
        /// Allowed values in order
        values: Vec<String>,
    },
    /// A type the driver does not model; rendered verbatim
    Unsupported {
        /// SQL spelling
        raw: String,
    },
}

/// Column default expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal, quoted when written
    String(String),
    /// Raw SQL expression such as `CURRENT_TIMESTAMP`
    Raw(String),
}

/// Identity generation strategy (PostgreSQL).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityGeneration {
    /// `GENERATED ALWAYS`
    Always,
    /// `GENERATED BY DEFAULT`
    ByDefault,
}

impl IdentityGeneration {
    /// Keyword used in schema documents.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "ALWAYS",
            Self::ByDefault => "BY_DEFAULT",
        }
    }
}

/// Identity column attributes (PostgreSQL).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// Generation strategy
    pub generation: IdentityGeneration,
    /// First value, when not the default of 1
    pub start: Option<u64>,
}

/// Primary key columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    /// Key columns in order
    pub columns: Vec<String>,
}

/// A secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// Index name
    pub name: String,
    /// Unique index
    pub unique: bool,
    /// Indexed columns in order
    pub columns: Vec<String>,
}

/// A foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Constraint name
    pub symbol: String,
    /// Referencing columns
    pub columns: Vec<String>,
    /// Referenced table
    pub ref_table: String,
    /// Referenced columns
    pub ref_columns: Vec<String>,
    /// Action on update
    pub on_update: ReferenceOption,
    /// Action on delete
    pub on_delete: ReferenceOption,
}
