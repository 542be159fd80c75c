//! Logical plan IR.
//!
//! A `LogicalPlan` is built fresh for every compile request, either by
//! [`plan_builder`] from upstream candidate filters or deserialized from JSON
//! produced elsewhere. Once built, every name it carries is canonical (exact
//! schema spelling).

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

pub mod errors;
pub mod plan_builder;
pub mod plan_validator;

pub use plan_builder::{
    build_logical_plan, PlanBuildOutcome, PlanBuilder, PlanRequest, RawFilter, RejectedFilter,
};
pub use plan_validator::validate_plan;

/// Filter values are JSON scalars or lists of scalars.
pub type FilterValue = serde_json::Value;

/// Comparison operator of a filter predicate.
///
/// Parsed from the word tokens `eq, ne, neq, gt, lt, gte, lte, in` or their
/// symbolic forms. Any other token is kept verbatim as `Unknown`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    #[default]
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanEqual,
    LessThanEqual,
    In,
    Unknown(String),
}

lazy_static! {
    static ref OPERATOR_TOKENS: HashMap<&'static str, Operator> = {
        let mut m = HashMap::new();
        m.insert("eq", Operator::Equal);
        m.insert("=", Operator::Equal);
        m.insert("==", Operator::Equal);
        m.insert("ne", Operator::NotEqual);
        m.insert("neq", Operator::NotEqual);
        m.insert("!=", Operator::NotEqual);
        m.insert("<>", Operator::NotEqual);
        m.insert("gt", Operator::GreaterThan);
        m.insert(">", Operator::GreaterThan);
        m.insert("lt", Operator::LessThan);
        m.insert("<", Operator::LessThan);
        m.insert("gte", Operator::GreaterThanEqual);
        m.insert(">=", Operator::GreaterThanEqual);
        m.insert("lte", Operator::LessThanEqual);
        m.insert("<=", Operator::LessThanEqual);
        m.insert("in", Operator::In);
        m
    };
}

impl Operator {
    pub fn from_token(token: &str) -> Self {
        let normalized = token.trim().to_lowercase();
        OPERATOR_TOKENS
            .get(normalized.as_str())
            .cloned()
            .unwrap_or_else(|| Operator::Unknown(token.trim().to_string()))
    }

    /// Canonical token (`eq`, `ne`, ...); unknown operators keep their text.
    pub fn token(&self) -> &str {
        match self {
            Operator::Equal => "eq",
            Operator::NotEqual => "ne",
            Operator::GreaterThan => "gt",
            Operator::LessThan => "lt",
            Operator::GreaterThanEqual => "gte",
            Operator::LessThanEqual => "lte",
            Operator::In => "in",
            Operator::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Operator {
    fn from(token: String) -> Self {
        Operator::from_token(&token)
    }
}

impl From<&str> for Operator {
    fn from(token: &str) -> Self {
        Operator::from_token(token)
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.token().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// `Type.field[.field...]`, canonical spelling
    pub field_path: String,
    #[serde(default)]
    pub operator: Operator,
    pub value: FilterValue,
}

impl Filter {
    pub fn new(
        field_path: impl Into<String>,
        operator: impl Into<Operator>,
        value: impl Into<FilterValue>,
    ) -> Self {
        Filter {
            field_path: field_path.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// Dedup key: path, canonical operator and the value's JSON text.
    pub fn signature(&self) -> (String, String, String) {
        (
            self.field_path.clone(),
            self.operator.token().to_string(),
            normalized_value(&self.value),
        )
    }
}

/// Stable textual form of a value, used for dedup.
pub fn normalized_value(value: &FilterValue) -> String {
    value.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Join {
    pub from_type: String,
    pub to_type: String,
    pub via: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalPlan {
    pub root: String,
    #[serde(default)]
    pub joins: Vec<Join>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub select: Vec<String>,
}

impl LogicalPlan {
    pub fn new(root: impl Into<String>) -> Self {
        LogicalPlan {
            root: root.into(),
            joins: Vec::new(),
            filters: Vec::new(),
            select: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
