//! Unit tests for the SQLite driver.

use super::*;
use crate::config::ConnectionConfig;

const SCRATCH_URL: &str = "sqlite3://file?mode=memory&cache=shared&_fk=1";

// =============================================================================
// Dev URL Translation Tests
// =============================================================================

#[test]
fn test_translate_default_dev_url() {
    let target = translate_dev_url(SCRATCH_URL).unwrap();
    assert_eq!(target.url, "sqlite::memory:");
    assert!(target.foreign_keys);
    assert!(target.is_in_memory());
}

#[test]
fn test_translate_drops_go_driver_params() {
    let target = translate_dev_url("sqlite://dev.db?_busy_timeout=5000&_journal=WAL").unwrap();
    assert_eq!(target.url, "sqlite://dev.db");
    assert!(!target.foreign_keys);
    assert!(!target.is_in_memory());
}

#[test]
fn test_translate_keeps_sqlx_params() {
    let target = translate_dev_url("sqlite3://dev.db?mode=ro&cache=private").unwrap();
    assert_eq!(target.url, "sqlite://dev.db?mode=ro&cache=private");
}

#[test]
fn test_translate_absolute_path() {
    let target = translate_dev_url("sqlite3:///tmp/dev.db?_fk=0").unwrap();
    assert_eq!(target.url, "sqlite:///tmp/dev.db");
    assert!(!target.foreign_keys);
}

#[test]
fn test_translate_rejects_other_schemes() {
    let err = translate_dev_url("mysql://localhost/dev").unwrap_err();
    assert!(matches!(err, SchemaVizError::UnsupportedScheme { .. }));
}

#[test]
fn test_translate_requires_file_or_memory() {
    let err = translate_dev_url("sqlite3://").unwrap_err();
    assert!(matches!(err, SchemaVizError::Configuration { .. }));
}

// =============================================================================
// Driver Tests (in-memory)
// =============================================================================

#[tokio::test]
async fn test_empty_database_inspects_as_main() {
    let driver = SqliteDriver::connect(SCRATCH_URL, &ConnectionConfig::default())
        .await
        .unwrap();

    let schema = driver.inspect_schema().await.unwrap();
    assert_eq!(schema.name, "main");
    assert!(schema.tables.is_empty());
    assert!(!driver.supports_normalize());
    assert_eq!(driver.dialect(), Dialect::SQLite);

    driver.close().await;
}

#[tokio::test]
async fn test_inspect_existing_tables() {
    let driver = SqliteDriver::connect(SCRATCH_URL, &ConnectionConfig::default())
        .await
        .unwrap();

    sqlx::query("CREATE TABLE pets (id INTEGER PRIMARY KEY, name VARCHAR(20) NOT NULL, age INT)")
        .execute(driver.pool())
        .await
        .unwrap();

    let schema = driver.inspect_schema().await.unwrap();
    assert_eq!(schema.tables.len(), 1);

    let pets = &schema.tables[0];
    assert_eq!(pets.name, "pets");
    assert_eq!(pets.columns.len(), 3);
    assert_eq!(
        pets.primary_key.as_ref().unwrap().columns,
        vec!["id".to_string()]
    );

    let name = pets.column("name").unwrap();
    assert!(!name.column_type.null);
    assert_eq!(name.column_type.raw, "VARCHAR(20)");
    assert!(pets.column("age").unwrap().column_type.null);

    driver.close().await;
}

#[tokio::test]
async fn test_normalize_is_not_supported() {
    let driver = SqliteDriver::connect(SCRATCH_URL, &ConnectionConfig::default())
        .await
        .unwrap();

    let err = driver
        .normalize_schema(Schema::new("main"))
        .await
        .unwrap_err();
    assert!(matches!(err, SchemaVizError::Normalize { .. }));

    driver.close().await;
}
