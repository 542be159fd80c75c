use thiserror::Error;

use crate::graph_catalog::errors::{GraphSchemaError, PathResolutionError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryGeneratorError {
    #[error("Schema error: {0}")]
    Schema(#[from] GraphSchemaError),
    #[error("Path resolution error: {0}")]
    PathResolution(PathResolutionError),
}

impl From<PathResolutionError> for QueryGeneratorError {
    /// A path ending on an object type is reported as a schema error; every
    /// other resolution failure stays a path error.
    fn from(err: PathResolutionError) -> Self {
        match err.into_schema_error() {
            Ok(schema_err) => QueryGeneratorError::Schema(schema_err),
            Err(path_err) => QueryGeneratorError::PathResolution(path_err),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unknown unresolved-filter policy '{0}'; expected 'skip' or 'error'")]
pub struct ParsePolicyError(pub String);
