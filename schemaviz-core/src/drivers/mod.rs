//! Dialect drivers for the scratch database.
//!
//! A driver inspects the live dev database, optionally normalizes a desired
//! schema against it, and marshals schemas into HCL documents.
//!
//! # Module Structure
//! - `spec`: Shared schema document marshaling
//! - `sqlite`, `mysql`, `postgres`: Per-dialect connection and inspection

pub mod spec;

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgresql")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use crate::config::ConnectionConfig;
use crate::dev_url::{self, Dialect};
use crate::schema::Schema;
use crate::{Result, error::SchemaVizError};
use async_trait::async_trait;

/// Optional driver capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverFeature {
    /// Reading the current schema of the dev database
    Inspect,
    /// Filling server-side defaults into a desired schema
    Normalize,
}

/// Object-safe interface over one open dev database.
///
/// Every driver must be closed with [`Driver::close`] once the caller is
/// done with it, on success and failure alike.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Dialect the driver speaks.
    fn dialect(&self) -> Dialect;

    /// Checks if the driver supports a specific feature.
    fn supports_feature(&self, feature: DriverFeature) -> bool;

    /// Shorthand for `supports_feature(DriverFeature::Normalize)`.
    fn supports_normalize(&self) -> bool {
        self.supports_feature(DriverFeature::Normalize)
    }

    /// Reads the current schema of the connected database.
    ///
    /// # Errors
    /// Returns [`SchemaVizError::Connection`] when the catalog cannot be read
    async fn inspect_schema(&self) -> Result<Schema>;

    /// Rewrites `schema` into the form the database would report after
    /// applying it.
    ///
    /// # Errors
    /// Returns [`SchemaVizError::Normalize`] when the driver does not support
    /// normalization or the database cannot be queried
    async fn normalize_schema(&self, schema: Schema) -> Result<Schema> {
        drop(schema);
        Err(SchemaVizError::normalize_failed(
            format!("{} driver", self.dialect()),
            std::io::Error::other("normalization is not supported"),
        ))
    }

    /// Marshals `schema` into an HCL schema document.
    ///
    /// # Errors
    /// Returns [`SchemaVizError::Marshal`] if the schema is internally inconsistent
    fn marshal_spec(&self, schema: &Schema) -> Result<Vec<u8>> {
        spec::marshal_schema(schema, self.dialect())
    }

    /// Releases the underlying connection pool.
    async fn close(&self);
}

/// Opens a driver for `url`.
///
/// # Errors
/// Returns an error if:
/// - The URL is malformed or its scheme is not supported
/// - The dialect was not compiled in
/// - The database cannot be reached
///
/// # Example
/// ```rust,no_run
/// use schemaviz_core::config::ConnectionConfig;
/// use schemaviz_core::drivers::open;
///
/// # async fn example() -> schemaviz_core::Result<()> {
/// let driver = open("sqlite3://file?mode=memory&_fk=1", &ConnectionConfig::default()).await?;
/// let schema = driver.inspect_schema().await?;
/// println!("{} has {} tables", schema.name, schema.tables.len());
/// driver.close().await;
/// # Ok(())
/// # }
/// ```
pub async fn open(url: &str, config: &ConnectionConfig) -> Result<Box<dyn Driver>> {
    config.validate()?;
    let target = dev_url::resolve(url)?;

    match target.dialect {
        #[cfg(feature = "sqlite")]
        Dialect::SQLite => {
            let driver = sqlite::SqliteDriver::connect(url, config).await?;
            Ok(Box::new(driver))
        }
        #[cfg(not(feature = "sqlite"))]
        Dialect::SQLite => Err(not_compiled("sqlite")),

        #[cfg(feature = "mysql")]
        Dialect::MySQL => {
            let driver = mysql::MySqlDriver::connect(url, config).await?;
            Ok(Box::new(driver))
        }
        #[cfg(not(feature = "mysql"))]
        Dialect::MySQL => Err(not_compiled("mysql")),

        #[cfg(feature = "postgresql")]
        Dialect::PostgreSQL => {
            let driver = postgres::PostgresDriver::connect(url, config).await?;
            Ok(Box::new(driver))
        }
        #[cfg(not(feature = "postgresql"))]
        Dialect::PostgreSQL => Err(not_compiled("postgresql")),
    }
}

#[allow(dead_code)]
fn not_compiled(feature: &str) -> SchemaVizError {
    SchemaVizError::configuration(format!(
        "driver not available, compile with --features {} to enable it",
        feature
    ))
}
