//! Unit tests for entity loading.

use super::*;
use crate::error::SchemaVizError;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

#[test]
fn test_load_single_entity_directory() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "user.json",
        r#"{ "name": "User", "fields": [{ "name": "name", "type": "string" }] }"#,
    );

    let tables = load_table_set(dir.path()).unwrap();
    assert_eq!(tables.len(), 1);

    let users = tables.table("users").unwrap();
    assert_eq!(users.primary_key, vec!["id".to_string()]);
    assert_eq!(users.columns.len(), 2);

    let id = users.column("id").unwrap();
    assert_eq!(id.field_type, FieldType::Int);
    assert!(id.increment);
    assert!(!id.nullable);

    let name = users.column("name").unwrap();
    assert_eq!(name.field_type, FieldType::String);
    assert!(!name.nullable);
    assert!(!name.increment);
}

#[test]
fn test_nillable_does_not_change_the_column() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "user.json",
        r#"{ "name": "User", "fields": [
            { "name": "nick", "type": "string", "optional": true, "nillable": true },
            { "name": "email", "type": "string", "nillable": true }
        ] }"#,
    );

    let tables = load_table_set(dir.path()).unwrap();
    let users = tables.table("users").unwrap();
    assert!(users.column("nick").unwrap().nullable);
    assert!(!users.column("email").unwrap().nullable);
}

#[test]
fn test_entities_are_sorted_by_name() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.json", r#"{ "name": "Zebra" }"#);
    write(&dir, "b.json", r#"{ "name": "Apple" }"#);
    write(&dir, "notes.txt", "ignored");

    let tables = load_table_set(dir.path()).unwrap();
    let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["apples", "zebras"]);
}

#[test]
fn test_entities_array_document() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "schema.json",
        r#"{ "entities": [ { "name": "User" }, { "name": "Category", "table": "cats" } ] }"#,
    );

    let tables = load_table_set(&dir.path().join("schema.json")).unwrap();
    assert!(tables.table("users").is_some());
    assert!(tables.table("cats").is_some());
}

#[test]
fn test_edges_become_foreign_keys() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "schema.json",
        r#"[
            { "name": "User" },
            {
                "name": "Pet",
                "fields": [{ "name": "name", "type": "string" }],
                "edges": [{ "name": "owner", "to": "User" }],
                "indexes": [{ "fields": ["name", "owner"], "unique": true }]
            }
        ]"#,
    );

    let tables = load_table_set(dir.path()).unwrap();
    let pets = tables.table("pets").unwrap();

    let owner = pets.column("owner_id").unwrap();
    assert!(owner.nullable);
    assert_eq!(owner.field_type, FieldType::Int);
    assert!(!owner.increment);

    assert_eq!(pets.foreign_keys.len(), 1);
    let fk = &pets.foreign_keys[0];
    assert_eq!(fk.symbol, "pets_users_owner");
    assert_eq!(fk.ref_table, "users");
    assert_eq!(fk.ref_columns, vec!["id".to_string()]);
    assert_eq!(fk.on_delete, ReferenceOption::SetNull);

    assert_eq!(pets.indexes.len(), 1);
    assert_eq!(pets.indexes[0].name, "pets_name_owner_id");
    assert!(pets.indexes[0].unique);
}

#[test]
fn test_required_edge_is_not_nullable() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "schema.json",
        r#"[
            { "name": "User", "id": { "type": "uuid" } },
            { "name": "Pet", "edges": [{ "name": "owner", "to": "User", "required": true }] }
        ]"#,
    );

    let tables = load_table_set(dir.path()).unwrap();
    let owner = tables.table("pets").unwrap().column("owner_id").unwrap();
    assert!(!owner.nullable);
    assert_eq!(owner.field_type, FieldType::Uuid);
    assert_eq!(
        tables.table("pets").unwrap().foreign_keys[0].on_delete,
        ReferenceOption::NoAction
    );
}

#[test]
fn test_unknown_edge_target_fails() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "pet.json",
        r#"{ "name": "Pet", "edges": [{ "name": "owner", "to": "Ghost" }] }"#,
    );

    let err = load_table_set(dir.path()).unwrap_err();
    assert!(matches!(err, SchemaVizError::SchemaLoad { .. }));
    assert!(err.to_string().contains("Ghost"));
}

#[test]
fn test_duplicate_column_fails() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "user.json",
        r#"{ "name": "User", "fields": [{ "name": "id", "type": "string" }] }"#,
    );

    let err = load_table_set(dir.path()).unwrap_err();
    assert!(err.to_string().contains("duplicate column id"));
}

#[test]
fn test_invalid_document_fails_validation() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "user.json",
        r#"{ "name": "User", "fields": [{ "name": "name", "type": "varchar" }] }"#,
    );

    let err = load_table_set(dir.path()).unwrap_err();
    assert!(matches!(err, SchemaVizError::SchemaLoad { .. }));
    assert!(err.to_string().contains("validating"));
}

#[test]
fn test_missing_path_fails() {
    let err = load_table_set(std::path::Path::new("/definitely/not/here")).unwrap_err();
    assert!(matches!(err, SchemaVizError::SchemaLoad { .. }));
}

#[test]
fn test_empty_directory_fails() {
    let dir = TempDir::new().unwrap();
    let err = load_table_set(dir.path()).unwrap_err();
    assert!(err.to_string().contains("no entity definitions"));
}

#[test]
fn test_enum_without_values_fails() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "user.json",
        r#"{ "name": "User", "fields": [{ "name": "role", "type": "enum" }] }"#,
    );

    let err = load_table_set(dir.path()).unwrap_err();
    assert!(err.to_string().contains("enum fields need at least one value"));
}
