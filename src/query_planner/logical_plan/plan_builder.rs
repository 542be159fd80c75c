//! Builds a `LogicalPlan` from upstream candidate filters.
//!
//! Candidates arrive unordered and unvalidated. Each one is resolved against
//! the schema (case-insensitively, relative to the root); failures are
//! returned as `RejectedFilter`s rather than dropped. Accepted filters are
//! rewritten to canonical spelling and deduplicated by
//! `(field_path, operator, value)` keeping the first occurrence.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::graph_catalog::{FieldLookup, FieldResolver, SchemaModel};

use super::errors::LogicalPlanError;
use super::{Filter, FilterValue, Join, LogicalPlan, Operator};

pub type LogicalPlanResult<T> = Result<T, LogicalPlanError>;

/// Candidate filter as emitted by the inference collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFilter {
    pub field_path: String,
    #[serde(default = "default_operator_token")]
    pub operator: String,
    #[serde(default)]
    pub value: FilterValue,
}

fn default_operator_token() -> String {
    "eq".to_string()
}

impl RawFilter {
    pub fn new(
        field_path: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        RawFilter {
            field_path: field_path.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// Everything a caller knows about the query before the plan exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub filters: Vec<RawFilter>,
    #[serde(default)]
    pub select: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedFilter {
    pub filter: RawFilter,
    pub reason: LogicalPlanError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanBuildOutcome {
    pub plan: LogicalPlan,
    /// Candidates excluded from the plan, in input order
    pub rejected: Vec<RejectedFilter>,
}

impl PlanBuildOutcome {
    /// Raw field paths of the rejected candidates, sorted and deduplicated.
    pub fn rejected_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .rejected
            .iter()
            .map(|r| r.filter.field_path.clone())
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }
}

pub struct PlanBuilder<'a> {
    schema: &'a SchemaModel,
    default_root: Option<String>,
    default_select: HashMap<String, Vec<String>>,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(schema: &'a SchemaModel) -> Self {
        PlanBuilder {
            schema,
            default_root: None,
            default_select: HashMap::new(),
        }
    }

    /// Root used when a request names none (ignored if undeclared).
    pub fn with_default_root(mut self, root: Option<String>) -> Self {
        self.default_root = root;
        self
    }

    /// Per-root selection used when a request selects nothing.
    pub fn with_default_select(mut self, defaults: HashMap<String, Vec<String>>) -> Self {
        self.default_select = defaults;
        self
    }

    pub fn build(&self, request: &PlanRequest) -> LogicalPlanResult<PlanBuildOutcome> {
        let root = self.choose_root(request.root.as_deref())?;
        let resolver = FieldResolver::new(self.schema);

        log::debug!(
            "build_logical_plan: root={}, {} candidate filters, {} select fields",
            root,
            request.filters.len(),
            request.select.len()
        );

        let joins = self.derive_joins(&root);

        let mut filters = Vec::new();
        let mut rejected = Vec::new();
        let mut signatures = HashSet::new();

        for raw in &request.filters {
            match Self::accept_filter(&resolver, &root, raw) {
                Ok(filter) => {
                    if signatures.insert(filter.signature()) {
                        filters.push(filter);
                    } else {
                        log::debug!(
                            "build_logical_plan: dropping duplicate filter {} {} {}",
                            filter.field_path,
                            filter.operator,
                            filter.value
                        );
                    }
                }
                Err(reason) => {
                    log::warn!("Rejected candidate filter '{}': {}", raw.field_path, reason);
                    rejected.push(RejectedFilter {
                        filter: raw.clone(),
                        reason,
                    });
                }
            }
        }

        let select = self.resolve_select(&root, &request.select)?;

        Ok(PlanBuildOutcome {
            plan: LogicalPlan {
                root,
                joins,
                filters,
                select,
            },
            rejected,
        })
    }

    fn choose_root(&self, requested: Option<&str>) -> LogicalPlanResult<String> {
        if let Some(name) = requested {
            return self
                .schema
                .resolve_type_name(name)
                .map(str::to_string)
                .ok_or_else(|| LogicalPlanError::UnknownRootType(name.to_string()));
        }
        if let Some(root) = self
            .default_root
            .as_deref()
            .and_then(|name| self.schema.resolve_type_name(name))
        {
            return Ok(root.to_string());
        }
        self.schema
            .type_names()
            .next()
            .map(str::to_string)
            .ok_or(LogicalPlanError::NoTypes)
    }

    /// Relations reachable from the root, in declaration order.
    ///
    /// A relation joins the plan when its source is the root or the target of
    /// a join already taken.
    fn derive_joins(&self, root: &str) -> Vec<Join> {
        let mut joins: Vec<Join> = Vec::new();
        for (from_type, to_type) in self.schema.relations() {
            let connected = from_type == root || joins.iter().any(|j| &j.to_type == from_type);
            if !connected || joins.iter().any(|j| &j.from_type == from_type && &j.to_type == to_type) {
                continue;
            }
            let via = self
                .schema
                .type_def(from_type)
                .and_then(|def| {
                    def.fields
                        .iter()
                        .find(|(_, ft)| ft.referenced_type() == Some(to_type.as_str()))
                        .map(|(name, _)| name.clone())
                })
                .unwrap_or_else(|| to_type.to_lowercase());
            joins.push(Join {
                from_type: from_type.clone(),
                to_type: to_type.clone(),
                via,
            });
        }
        joins
    }

    fn accept_filter(
        resolver: &FieldResolver<'_>,
        root: &str,
        raw: &RawFilter,
    ) -> LogicalPlanResult<Filter> {
        let resolved =
            resolver.resolve_from_root(root, &raw.field_path, FieldLookup::CaseInsensitive)?;

        if !is_supported_value(&raw.value) {
            return Err(LogicalPlanError::UnsupportedValue {
                field_path: raw.field_path.clone(),
            });
        }

        Ok(Filter {
            field_path: resolved.canonical_path(),
            operator: Operator::from_token(&raw.operator),
            value: raw.value.clone(),
        })
    }

    fn resolve_select(&self, root: &str, requested: &[String]) -> LogicalPlanResult<Vec<String>> {
        let fields = if requested.is_empty() {
            self.default_select.get(root).map(Vec::as_slice).unwrap_or(&[])
        } else {
            requested
        };

        let mut select: Vec<String> = Vec::with_capacity(fields.len());
        for name in fields {
            let (canonical, field_type) = self.schema.resolve_field(root, name).ok_or_else(|| {
                LogicalPlanError::UnknownSelectField {
                    root: root.to_string(),
                    field: name.clone(),
                }
            })?;
            if !field_type.is_scalar() {
                return Err(LogicalPlanError::NonScalarSelectField {
                    root: root.to_string(),
                    field: canonical.to_string(),
                });
            }
            if !select.iter().any(|s| s == canonical) {
                select.push(canonical.to_string());
            }
        }
        Ok(select)
    }
}

/// Scalars and lists of scalars; objects are not representable in either target.
fn is_supported_value(value: &FilterValue) -> bool {
    match value {
        FilterValue::Object(_) => false,
        FilterValue::Array(items) => items
            .iter()
            .all(|item| !matches!(item, FilterValue::Object(_) | FilterValue::Array(_))),
        _ => true,
    }
}

/// Convenience wrapper: build with no defaults.
pub fn build_logical_plan(
    schema: &SchemaModel,
    request: &PlanRequest,
) -> LogicalPlanResult<PlanBuildOutcome> {
    PlanBuilder::new(schema).build(request)
}
