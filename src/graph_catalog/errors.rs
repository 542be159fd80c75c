//! # Schema Error Types
//!
//! Error handling for schema loading, type-graph traversal and field-path
//! resolution.
//!
//! ## Error Categories
//!
//! - **Schema Errors** (`GraphSchemaError`): malformed or referentially
//!   inconsistent schemas, and paths that resolve to the wrong field kind for
//!   the renderer consuming them
//! - **Path Errors** (`PathResolutionError`): a dotted field path that cannot
//!   be walked against the schema
//!
//! ## Usage Patterns
//!
//! Every path error names the offending `field_path` so callers can surface
//! the message verbatim:
//!
//! ```ignore
//! // ✅ GOOD: names the path and the failing segment
//! PathResolutionError::UnknownField {
//!     field_path: "Facility.locaton.city".into(),
//!     type_name: "Facility".into(),
//!     field: "locaton".into(),
//! }
//! ```

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphSchemaError {
    #[error("Unknown root type `{type_name}`")]
    UnknownRootType { type_name: String },
    #[error("Schema declares no root queries")]
    NoRootQueries,
    #[error("Relation ({from_type}, {to_type}) references undeclared type '{missing}'")]
    UndeclaredRelationEndpoint {
        from_type: String,
        to_type: String,
        missing: String,
    },
    #[error("Filter path '{field_path}': field '{field}' on '{type_name}' resolves to object type '{target}'; expected scalar")]
    NonScalarTerminal {
        field_path: String,
        type_name: String,
        field: String,
        target: String,
    },
    #[error("Failed to read schema file: {error}")]
    SchemaReadError { error: String },
    #[error("Failed to parse schema: {error}")]
    SchemaParseError { error: String },
}

impl GraphSchemaError {
    /// Create a read error that names the file being loaded
    pub fn read_error_with_context(path: impl Into<String>, error: impl Into<String>) -> Self {
        GraphSchemaError::SchemaReadError {
            error: format!("'{}': {}", path.into(), error.into()),
        }
    }
}

/// A dotted field path failed to resolve against the schema.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PathResolutionError {
    #[error("Filter path is empty")]
    EmptyPath,
    #[error("Filter path '{field_path}' names no field")]
    MissingField { field_path: String },
    #[error("Filter path '{field_path}' references unknown type '{type_name}'")]
    UnknownType {
        field_path: String,
        type_name: String,
    },
    #[error("Filter path '{field_path}': unknown field '{field}' on type '{type_name}'")]
    UnknownField {
        field_path: String,
        type_name: String,
        field: String,
    },
    #[error("Filter path '{field_path}': field '{field}' on type '{type_name}' is scalar and cannot be traversed")]
    ScalarTraversal {
        field_path: String,
        type_name: String,
        field: String,
    },
    #[error("Filter path '{field_path}': field '{field}' on type '{type_name}' resolves to object type '{target}'; expected scalar")]
    NonScalarTerminal {
        field_path: String,
        type_name: String,
        field: String,
        target: String,
    },
    #[error("Filter path '{field_path}': type '{target}' is unreachable from root '{root}'")]
    Unreachable {
        field_path: String,
        root: String,
        target: String,
    },
}

impl PathResolutionError {
    /// The offending field path, if the error carries one.
    pub fn field_path(&self) -> Option<&str> {
        match self {
            PathResolutionError::EmptyPath => None,
            PathResolutionError::MissingField { field_path }
            | PathResolutionError::UnknownType { field_path, .. }
            | PathResolutionError::UnknownField { field_path, .. }
            | PathResolutionError::ScalarTraversal { field_path, .. }
            | PathResolutionError::NonScalarTerminal { field_path, .. }
            | PathResolutionError::Unreachable { field_path, .. } => Some(field_path),
        }
    }

    /// Split off the one path failure that is really a schema-kind mismatch.
    ///
    /// A path ending on an object type is a `GraphSchemaError` for renderers
    /// that need a scalar terminal; every other variant is returned unchanged.
    pub fn into_schema_error(self) -> Result<GraphSchemaError, Self> {
        match self {
            PathResolutionError::NonScalarTerminal {
                field_path,
                type_name,
                field,
                target,
            } => Ok(GraphSchemaError::NonScalarTerminal {
                field_path,
                type_name,
                field,
                target,
            }),
            other => Err(other),
        }
    }
}
