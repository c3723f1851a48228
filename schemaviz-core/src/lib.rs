//! Schema extraction and share-link publishing.
//!
//! This crate turns entity definitions into an HCL schema document and
//! publishes that document to a remote visualization service.
//!
//! # Pipeline
//! 1. [`dev_url::resolve`] maps the scratch database URL to a dialect and driver tag
//! 2. [`extract::extract`] loads the entity graph, captures the desired schema
//!    from the migration planner, normalizes and marshals it
//! 3. [`share::share`] uploads the document and returns the public link
//!
//! # Security Guarantees
//! - Database passwords are redacted before reaching logs or error messages
//! - The scratch database is only inspected, never migrated
//! - Every connection pool is closed on success and failure

mod cancel;

pub mod config;
pub mod dev_url;
pub mod drivers;
pub mod error;
pub mod extract;
pub mod graph;
pub mod logging;
pub mod migrate;
pub mod schema;
pub mod share;
pub mod types;

// Re-export commonly used types
pub use config::{ConnectionConfig, ShareConfig};
pub use dev_url::{ConnectionTarget, Dialect, resolve};
pub use drivers::{Driver, DriverFeature};
pub use error::{Result, SchemaVizError, ShareProtocolError, ShareStage, TransportError};
pub use extract::{CaptureDesired, ExtractOptions, SchemaDocument, extract};
pub use graph::{EntityLoader, SchemaLoader, TableSet};
pub use migrate::{DiffOutcome, Differ, Migrate, MigrateOptions, PlanOutcome, Planner};
pub use share::{HttpTransport, ShareClient, Transport, TransportResponse, share};
