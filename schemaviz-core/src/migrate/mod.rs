//! Migration planner.
//!
//! [`Migrate`] computes the desired schema for a [`TableSet`], inspects the
//! current schema of the dev database, and hands both to a [`Differ`]. The
//! differ decides what the plan contains; returning [`DiffOutcome::Skip`]
//! ends planning successfully with [`PlanOutcome::Skipped`].
//!
//! # Module Structure
//! - `convert`: TableSet to desired tables per dialect

pub mod convert;

use crate::config::ConnectionConfig;
use crate::dev_url::{self, Dialect};
use crate::drivers::{self, Driver};
use crate::graph::TableSet;
use crate::schema::{Schema, Table};
use crate::{Result, error::SchemaVizError};
use async_trait::async_trait;

pub use convert::{TYPE_TABLE, desired_tables};

/// Planner options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrateOptions {
    /// Dialect of the desired tables
    pub dialect: Dialect,
    /// Reserve disjoint id ranges per table, registered in `ent_types`
    pub global_unique_id: bool,
}

impl MigrateOptions {
    /// Options for `dialect` without global unique ids.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            global_unique_id: false,
        }
    }

    /// Enables or disables global unique ids.
    pub fn with_global_unique_id(mut self, enabled: bool) -> Self {
        self.global_unique_id = enabled;
        self
    }
}

/// One planned change.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Create a table missing from the dev database
    AddTable(Table),
    /// Drop a table the entity graph no longer has
    DropTable(String),
}

/// Result of a single diff step.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffOutcome {
    /// Use these changes as the plan
    Changes(Vec<Change>),
    /// Stop planning; this is a successful outcome
    Skip,
}

/// Result of [`Migrate::create`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// The differ asked to skip
    Skipped,
    /// The differ produced a change set (possibly empty)
    Planned(Vec<Change>),
}

/// Computes changes between the current and desired schema.
pub trait Differ: Send {
    /// # Errors
    /// Any error aborts planning and is returned from [`Migrate::create`]
    fn diff(&mut self, current: &Schema, desired: &Schema) -> Result<DiffOutcome>;
}

/// Runs a differ over the current and desired schema of a [`TableSet`].
#[async_trait]
pub trait Planner: Send + Sync {
    /// Plans the migration to `tables`, consulting `differ` at most once.
    ///
    /// # Errors
    /// Returns an error if inspection, conversion or the differ fails
    async fn plan(&self, tables: &TableSet, differ: &mut dyn Differ) -> Result<PlanOutcome>;
}

/// Table-level differ: adds missing tables and drops unknown ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableDiffer;

impl Differ for TableDiffer {
    fn diff(&mut self, current: &Schema, desired: &Schema) -> Result<DiffOutcome> {
        let mut changes: Vec<Change> = desired
            .tables
            .iter()
            .filter(|t| current.table(&t.name).is_none())
            .cloned()
            .map(Change::AddTable)
            .collect();

        changes.extend(
            current
                .tables
                .iter()
                .filter(|t| desired.table(&t.name).is_none())
                .map(|t| Change::DropTable(t.name.clone())),
        );

        Ok(DiffOutcome::Changes(changes))
    }
}

/// Migration planner bound to one dev database.
pub struct Migrate {
    driver: Box<dyn Driver>,
    options: MigrateOptions,
}

impl std::fmt::Debug for Migrate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migrate")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Migrate {
    /// Wraps an open driver.
    ///
    /// # Errors
    /// Returns [`SchemaVizError::Configuration`] if the driver speaks another dialect
    pub fn new(driver: Box<dyn Driver>, options: MigrateOptions) -> Result<Self> {
        if driver.dialect() != options.dialect {
            return Err(SchemaVizError::configuration(format!(
                "planner dialect {} does not match driver dialect {}",
                options.dialect,
                driver.dialect()
            )));
        }
        Ok(Self { driver, options })
    }

    /// Opens a driver for `dev_url` and binds a planner to it.
    ///
    /// # Errors
    /// Returns an error if the URL does not resolve to `options.dialect` or
    /// the database cannot be reached
    pub async fn connect(
        dev_url: &str,
        options: MigrateOptions,
        config: &ConnectionConfig,
    ) -> Result<Self> {
        let target = dev_url::resolve(dev_url)?;
        if target.dialect != options.dialect {
            return Err(SchemaVizError::configuration(format!(
                "dev URL dialect {} does not match planner dialect {}",
                target.dialect, options.dialect
            )));
        }
        let driver = drivers::open(dev_url, config).await?;
        Self::new(driver, options)
    }

    /// Options this planner was built with.
    pub fn options(&self) -> MigrateOptions {
        self.options
    }

    /// Builds the desired schema for `tables`.
    ///
    /// The schema takes its name and default options from `current`.
    ///
    /// # Errors
    /// Returns [`SchemaVizError::SchemaPlan`] if a column has no type for the dialect
    pub fn desired_schema(&self, current: &Schema, tables: &TableSet) -> Result<Schema> {
        Ok(Schema {
            name: current.name.clone(),
            charset: current.charset.clone(),
            collation: current.collation.clone(),
            tables: desired_tables(tables, self.options.dialect, self.options.global_unique_id)?,
        })
    }

    /// Plans the migration of the dev database to `tables`.
    ///
    /// # Errors
    /// Returns an error if inspection, conversion or the differ fails
    pub async fn create(&self, tables: &TableSet, differ: &mut dyn Differ) -> Result<PlanOutcome> {
        let current = self.driver.inspect_schema().await?;
        let desired = self.desired_schema(&current, tables)?;

        tracing::debug!(
            dialect = %self.options.dialect,
            current_tables = current.tables.len(),
            desired_tables = desired.tables.len(),
            "Computing schema diff"
        );

        match differ.diff(&current, &desired)? {
            DiffOutcome::Skip => Ok(PlanOutcome::Skipped),
            DiffOutcome::Changes(changes) => Ok(PlanOutcome::Planned(changes)),
        }
    }

    /// Releases the dev database connection.
    pub async fn close(self) {
        self.driver.close().await;
    }
}

#[async_trait]
impl Planner for Migrate {
    async fn plan(&self, tables: &TableSet, differ: &mut dyn Differ) -> Result<PlanOutcome> {
        self.create(tables, differ).await
    }
}
