//! Dev URL resolution.
//!
//! The scheme of the scratch database URL selects both the planner dialect and
//! the driver tag sent to the remote visualization API. The rest of the URL is
//! driver-specific and is passed through untouched.

use crate::{Result, error::SchemaVizError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL dialects the extractor can plan against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// `sqlite://` and `sqlite3://`
    SQLite,
    /// `mysql://`
    MySQL,
    /// `postgres://`
    PostgreSQL,
}

impl Dialect {
    /// Planner-facing dialect name, also the key of per-dialect `schema_type` overrides.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SQLite => "sqlite3",
            Self::MySQL => "mysql",
            Self::PostgreSQL => "postgres",
        }
    }

    /// Driver tag understood by the remote visualization API.
    pub const fn driver_tag(self) -> &'static str {
        match self {
            Self::SQLite => "SQLITE",
            Self::MySQL => "MYSQL",
            Self::PostgreSQL => "POSTGRESQL",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SQLite => write!(f, "SQLite"),
            Self::MySQL => write!(f, "MySQL"),
            Self::PostgreSQL => write!(f, "PostgreSQL"),
        }
    }
}

/// Dialect and driver tag derived from a dev URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionTarget {
    /// Dialect named by the URL scheme
    pub dialect: Dialect,
    /// Tag the share service expects for this dialect
    pub driver_tag: &'static str,
}

impl From<Dialect> for ConnectionTarget {
    fn from(dialect: Dialect) -> Self {
        Self {
            dialect,
            driver_tag: dialect.driver_tag(),
        }
    }
}

/// Parses `url` and maps its scheme to a [`ConnectionTarget`].
///
/// # Errors
/// - [`SchemaVizError::InvalidUrl`] if `url` is not a well-formed URL
/// - [`SchemaVizError::UnsupportedScheme`] if the scheme is not
///   `sqlite`, `sqlite3`, `mysql` or `postgres`
///
/// # Example
/// ```rust
/// use schemaviz_core::dev_url::{Dialect, resolve};
///
/// let target = resolve("sqlite3://file?mode=memory&cache=shared&_fk=1").unwrap();
/// assert_eq!(target.dialect, Dialect::SQLite);
/// assert_eq!(target.driver_tag, "SQLITE");
/// ```
pub fn resolve(url: &str) -> Result<ConnectionTarget> {
    let parsed = url::Url::parse(url).map_err(|source| SchemaVizError::InvalidUrl {
        context: crate::error::redact_database_url(url),
        source,
    })?;

    let dialect = match parsed.scheme().to_ascii_lowercase().as_str() {
        "sqlite" | "sqlite3" => Dialect::SQLite,
        "mysql" => Dialect::MySQL,
        "postgres" => Dialect::PostgreSQL,
        other => {
            return Err(SchemaVizError::UnsupportedScheme {
                scheme: other.to_string(),
            });
        }
    };

    Ok(ConnectionTarget::from(dialect))
}
