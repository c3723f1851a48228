//! JSON Schema validation for entity definition documents.
//!
//! Entity documents are checked against an embedded JSON Schema before they
//! are deserialized, so that typos in field types or edge definitions are
//! reported as schema violations instead of a generic serde error.

use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

/// Entity document validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Schema compilation failed during initialization
    #[error("JSON Schema compilation failed: {message}")]
    SchemaCompilation {
        /// Compiler message
        message: String,
    },

    /// Validation failed with specific field errors
    #[error("entity validation failed with {error_count} errors: {}", errors.join("; "))]
    ValidationFailed {
        /// Number of violations
        error_count: usize,
        /// One message per violation
        errors: Vec<String>,
    },
}

/// Embedded JSON Schema for a single entity definition
const ENTITY_SCHEMA: &str = r##"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "schemaviz entity definition",
  "type": "object",
  "required": ["name"],
  "additionalProperties": false,
  "properties": {
    "name": { "type": "string", "pattern": "^[A-Za-z][A-Za-z0-9_]*$" },
    "table": { "type": "string", "minLength": 1 },
    "comment": { "type": "string" },
    "id": {
      "type": "object",
      "additionalProperties": false,
      "properties": {
        "type": { "$ref": "#/$defs/fieldType" },
        "size": { "type": "integer", "minimum": 1 },
        "schema_type": { "$ref": "#/$defs/schemaType" }
      }
    },
    "fields": { "type": "array", "items": { "$ref": "#/$defs/field" }, "default": [] },
    "edges": { "type": "array", "items": { "$ref": "#/$defs/edge" }, "default": [] },
    "indexes": { "type": "array", "items": { "$ref": "#/$defs/index" }, "default": [] }
  },
  "$defs": {
    "fieldType": {
      "enum": [
        "bool", "int", "int8", "int16", "int32", "int64",
        "uint", "uint8", "uint16", "uint32", "uint64",
        "float32", "float64", "string", "text", "bytes",
        "time", "json", "uuid", "enum", "other"
      ]
    },
    "schemaType": {
      "type": "object",
      "additionalProperties": { "type": "string", "minLength": 1 }
    },
    "referenceOption": {
      "enum": ["NO_ACTION", "RESTRICT", "CASCADE", "SET_NULL", "SET_DEFAULT"]
    },
    "field": {
      "type": "object",
      "required": ["name", "type"],
      "additionalProperties": false,
      "properties": {
        "name": { "type": "string", "pattern": "^[A-Za-z_][A-Za-z0-9_]*$" },
        "type": { "$ref": "#/$defs/fieldType" },
        "optional": { "type": "boolean" },
        "nillable": { "type": "boolean" },
        "unique": { "type": "boolean" },
        "size": { "type": "integer", "minimum": 1 },
        "default": {
          "oneOf": [
            { "type": ["boolean", "number", "string"] },
            {
              "type": "object",
              "required": ["expr"],
              "additionalProperties": false,
              "properties": { "expr": { "type": "string", "minLength": 1 } }
            }
          ]
        },
        "values": { "type": "array", "items": { "type": "string" }, "minItems": 1 },
        "schema_type": { "$ref": "#/$defs/schemaType" },
        "comment": { "type": "string" }
      }
    },
    "edge": {
      "type": "object",
      "required": ["name", "to"],
      "additionalProperties": false,
      "properties": {
        "name": { "type": "string", "pattern": "^[A-Za-z_][A-Za-z0-9_]*$" },
        "to": { "type": "string", "minLength": 1 },
        "required": { "type": "boolean" },
        "unique": { "type": "boolean" },
        "on_delete": { "$ref": "#/$defs/referenceOption" }
      }
    },
    "index": {
      "type": "object",
      "required": ["fields"],
      "additionalProperties": false,
      "properties": {
        "name": { "type": "string", "minLength": 1 },
        "fields": { "type": "array", "items": { "type": "string" }, "minItems": 1 },
        "unique": { "type": "boolean" }
      }
    }
  }
}"##;

/// Compiled JSON Schema instance (initialized once)
static COMPILED_SCHEMA: OnceLock<Validator> = OnceLock::new();

fn validator() -> Result<&'static Validator, ValidationError> {
    if let Some(compiled) = COMPILED_SCHEMA.get() {
        return Ok(compiled);
    }

    let schema_json: Value =
        serde_json::from_str(ENTITY_SCHEMA).map_err(|e| ValidationError::SchemaCompilation {
            message: format!("Failed to parse embedded schema: {}", e),
        })?;

    let compiled = jsonschema::validator_for(&schema_json).map_err(|e| {
        ValidationError::SchemaCompilation {
            message: format!("Schema compilation error: {}", e),
        }
    })?;

    Ok(COMPILED_SCHEMA.get_or_init(|| compiled))
}

/// Validates one entity definition.
///
/// # Errors
/// Returns every violation found in the document.
pub fn validate_entity(json_value: &Value) -> Result<(), ValidationError> {
    let schema = validator()?;

    let errors: Vec<String> = schema
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::ValidationFailed {
            error_count: errors.len(),
            errors,
        })
    }
}
