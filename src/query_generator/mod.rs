//! Renderers turning a `LogicalPlan` into target-language query text.
//!
//! Both renderers consume the plan and schema directly and share the
//! schema walk through `FieldResolver`; neither ever reads the other's output.
//! Each `render` call builds its own type graph and (for Cypher) its own alias
//! context, so renderers are safe to use from concurrent requests over one
//! shared `SchemaModel`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::query_planner::LogicalPlan;

pub mod cypher;
mod errors;
pub mod graphql;
pub mod literal;

pub use cypher::{relationship_label, CypherRenderer};
pub use errors::{ParsePolicyError, QueryGeneratorError};
pub use graphql::{select_entry_point, GraphQLRenderer};

pub type QueryGeneratorResult<T> = Result<T, QueryGeneratorError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderTarget {
    GraphQL,
    Cypher,
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderTarget::GraphQL => write!(f, "graphql"),
            RenderTarget::Cypher => write!(f, "cypher"),
        }
    }
}

/// What the GraphQL renderer does with a filter it cannot place under the
/// root (unreachable top-level type, or a path that no longer resolves).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedFilterPolicy {
    /// Leave the filter out of the where block
    #[default]
    Skip,
    /// Fail the render
    Error,
}

impl FromStr for UnresolvedFilterPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(UnresolvedFilterPolicy::Skip),
            "error" => Ok(UnresolvedFilterPolicy::Error),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

/// A renderer for one target language.
pub trait QueryRenderer {
    fn target(&self) -> RenderTarget;

    /// Render the whole plan; no partial text is returned on failure.
    fn render(&self, plan: &LogicalPlan) -> QueryGeneratorResult<String>;
}
