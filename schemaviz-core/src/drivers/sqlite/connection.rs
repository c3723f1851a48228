//! SQLite dev URL translation and pool creation.
//!
//! Dev URLs follow the `sqlite3://file?mode=memory&cache=shared&_fk=1` form.
//! They are rewritten into sqlx connection strings:
//! - `mode=memory` opens a private in-memory database per pool
//! - `mode`, `cache`, `immutable` and `vfs` are otherwise passed through
//! - `_fk=1` (or `_foreign_keys=1`) enables foreign key enforcement
//! - other `_`-prefixed driver parameters are dropped

use super::SqliteDriver;
use crate::config::ConnectionConfig;
use crate::{Result, error::SchemaVizError};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use url::Url;

/// Query parameters understood by sqlx.
const PASSTHROUGH_PARAMS: &[&str] = &["mode", "cache", "immutable", "vfs"];

/// sqlx spelling of a fresh in-memory database.
const MEMORY_URL: &str = "sqlite::memory:";

/// A dev URL rewritten for sqlx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteTarget {
    /// sqlx connection string
    pub url: String,
    /// Whether `PRAGMA foreign_keys` is turned on
    pub foreign_keys: bool,
}

impl SqliteTarget {
    /// True when the target is a private in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.url == MEMORY_URL
    }
}

/// Rewrites a `sqlite://` or `sqlite3://` dev URL into an sqlx connection string.
///
/// # Errors
/// Returns an error if the URL is malformed, uses another scheme, or names no
/// database file outside of memory mode
///
/// # Example
/// ```rust
/// use schemaviz_core::drivers::sqlite::translate_dev_url;
///
/// let target = translate_dev_url("sqlite3://file?mode=memory&cache=shared&_fk=1").unwrap();
/// assert_eq!(target.url, "sqlite::memory:");
/// assert!(target.foreign_keys);
/// ```
pub fn translate_dev_url(dev_url: &str) -> Result<SqliteTarget> {
    let parsed = Url::parse(dev_url).map_err(|source| SchemaVizError::InvalidUrl {
        context: crate::error::redact_database_url(dev_url),
        source,
    })?;

    let scheme = parsed.scheme().to_ascii_lowercase();
    if scheme != "sqlite" && scheme != "sqlite3" {
        return Err(SchemaVizError::UnsupportedScheme { scheme });
    }

    let mut filename = parsed.host_str().unwrap_or_default().to_string();
    filename.push_str(parsed.path());

    let mut kept = Vec::new();
    let mut foreign_keys = false;
    let mut in_memory = false;

    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            "_fk" | "_foreign_keys" => {
                foreign_keys = matches!(value.as_ref(), "1" | "true" | "on" | "yes");
            }
            k if PASSTHROUGH_PARAMS.contains(&k) => {
                if k == "mode" && value == "memory" {
                    in_memory = true;
                }
                kept.push(format!("{}={}", key, value));
            }
            k => {
                tracing::debug!(parameter = k, "Dropping unsupported SQLite parameter");
            }
        }
    }

    if filename.is_empty() && !in_memory {
        return Err(SchemaVizError::configuration(
            "SQLite dev URL names no database file; use mode=memory for a scratch database",
        ));
    }

    let url = if in_memory {
        MEMORY_URL.to_string()
    } else if kept.is_empty() {
        format!("sqlite://{}", filename)
    } else {
        format!("sqlite://{}?{}", filename, kept.join("&"))
    };

    Ok(SqliteTarget { url, foreign_keys })
}

impl SqliteDriver {
    /// Opens a single-connection pool for `dev_url`.
    ///
    /// # Errors
    /// Returns an error if the URL cannot be translated or the database cannot be opened
    pub async fn connect(dev_url: &str, config: &ConnectionConfig) -> Result<Self> {
        let target = translate_dev_url(dev_url)?;
        let pool = create_sqlite_pool(&target, config).await?;
        tracing::debug!(in_memory = target.is_in_memory(), "Opened SQLite dev database");
        Ok(Self { pool, target })
    }
}

async fn create_sqlite_pool(target: &SqliteTarget, config: &ConnectionConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&target.url)
        .map_err(|e| SchemaVizError::connection_failed(&target.url, e))?
        .foreign_keys(target.foreign_keys);

    // One connection keeps an in-memory database alive for the whole call
    SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(config.connect_timeout)
        .connect_with(options)
        .await
        .map_err(|e| SchemaVizError::connection_failed(&target.url, e))
}
