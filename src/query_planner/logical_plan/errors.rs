use thiserror::Error;

use crate::graph_catalog::errors::PathResolutionError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LogicalPlanError {
    #[error("Schema declares no types; cannot choose a root type")]
    NoTypes,
    #[error("Unknown root type: {0}")]
    UnknownRootType(String),
    #[error("Unknown select field '{field}' on root type {root}")]
    UnknownSelectField { root: String, field: String },
    #[error("Select field '{field}' on root type {root} is not scalar")]
    NonScalarSelectField { root: String, field: String },
    #[error("Filter path '{field_path}' has an unsupported value; expected a scalar or a list of scalars")]
    UnsupportedValue { field_path: String },
    #[error(transparent)]
    PathResolution(#[from] PathResolutionError),
}
