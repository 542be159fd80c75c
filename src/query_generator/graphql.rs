//! GraphQL renderer.
//!
//! Produces a filtered entry-point query:
//!
//! ```text
//! query {
//!   providers(where: {
//!     affiliations: { status: { eq: "ACTIVE" } }
//!     affiliations: { facility: { location: { city: { eq: "Los Angeles" } } } }
//!   }) {
//!     providerId
//!     name
//!   }
//! }
//! ```
//!
//! Each filter becomes its own top-level entry of the where object, even when
//! two filters share a path prefix. The innermost predicate is always written
//! as `{ eq: <literal> }`.
//!
//! The selection set is never empty: a plan with no select fields selects the
//! root's first scalar field, or `__typename` when it has none. The Cypher
//! counterpart is `RETURN DISTINCT root`.

use crate::graph_catalog::{
    FieldLookup, FieldResolver, GraphSchemaError, PathResolutionError, SchemaModel,
};
use crate::query_planner::LogicalPlan;

use super::literal::graphql_literal;
use super::{QueryGeneratorResult, QueryRenderer, RenderTarget, UnresolvedFilterPolicy};

const INDENT: &str = "  ";
const TYPENAME_FIELD: &str = "__typename";

/// Pick the root query field for `root_type`.
///
/// The first declared root query that is case-insensitively prefix-related
/// to the root type in either direction wins; otherwise the first declared
/// root query is used. Both directions are needed: plural entry points
/// (`providers` for `Provider`) extend the type name, while abbreviated ones
/// (`loc` for `Location`) shorten it. Declaration order breaks ties, so with
/// `["locations", "loc"]` the root `Location` maps to `locations`.
pub fn select_entry_point<'s>(
    schema: &'s SchemaModel,
    root_type: &str,
) -> Result<&'s str, GraphSchemaError> {
    let root_lower = root_type.to_lowercase();
    let queries = schema.root_queries();
    queries
        .iter()
        .find(|q| {
            let q_lower = q.to_lowercase();
            root_lower.starts_with(&q_lower) || q_lower.starts_with(&root_lower)
        })
        .or_else(|| queries.first())
        .map(String::as_str)
        .ok_or(GraphSchemaError::NoRootQueries)
}

pub struct GraphQLRenderer<'a> {
    schema: &'a SchemaModel,
    unresolved_policy: UnresolvedFilterPolicy,
}

impl<'a> GraphQLRenderer<'a> {
    pub fn new(schema: &'a SchemaModel) -> Self {
        GraphQLRenderer {
            schema,
            unresolved_policy: UnresolvedFilterPolicy::default(),
        }
    }

    pub fn with_unresolved_policy(mut self, policy: UnresolvedFilterPolicy) -> Self {
        self.unresolved_policy = policy;
        self
    }

    fn where_entries(&self, plan: &LogicalPlan) -> QueryGeneratorResult<Vec<String>> {
        let resolver = FieldResolver::new(self.schema);
        let mut entries = Vec::with_capacity(plan.filters.len());

        for filter in &plan.filters {
            let resolved =
                match resolver.resolve_from_root(&plan.root, &filter.field_path, FieldLookup::Exact)
                {
                    Ok(resolved) => resolved,
                    Err(e @ PathResolutionError::Unreachable { .. })
                        if self.unresolved_policy == UnresolvedFilterPolicy::Skip =>
                    {
                        log::warn!("Omitting filter from GraphQL where block: {}", e);
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };
            entries.push(nest_field_parts(
                &resolved.field_names(),
                &graphql_literal(&filter.value),
            ));
        }
        Ok(entries)
    }

    /// Selection lines; never empty.
    fn selection(&self, plan: &LogicalPlan) -> Vec<String> {
        if !plan.select.is_empty() {
            return plan.select.clone();
        }
        let fallback = self
            .schema
            .type_def(&plan.root)
            .and_then(|def| def.fields.iter().find(|(_, ft)| ft.is_scalar()))
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| TYPENAME_FIELD.to_string());
        vec![fallback]
    }
}

/// `["a", "b"]` + `1` → `a: { b: { eq: 1 } }`
fn nest_field_parts(parts: &[&str], literal: &str) -> String {
    match parts {
        [] => String::new(),
        [last] => format!("{}: {{ eq: {} }}", last, literal),
        [head, rest @ ..] => format!("{}: {{ {} }}", head, nest_field_parts(rest, literal)),
    }
}

impl QueryRenderer for GraphQLRenderer<'_> {
    fn target(&self) -> RenderTarget {
        RenderTarget::GraphQL
    }

    fn render(&self, plan: &LogicalPlan) -> QueryGeneratorResult<String> {
        if !self.schema.contains_type(&plan.root) {
            return Err(GraphSchemaError::UnknownRootType {
                type_name: plan.root.clone(),
            }
            .into());
        }
        let entry_point = select_entry_point(self.schema, &plan.root)?;
        let entries = self.where_entries(plan)?;

        log::debug!(
            "GraphQL render: entry point {}, {}/{} filters placed",
            entry_point,
            entries.len(),
            plan.filters.len()
        );

        let mut lines = vec!["query {".to_string()];
        if entries.is_empty() {
            lines.push(format!("{}{}(where: {{}}) {{", INDENT, entry_point));
        } else {
            lines.push(format!("{}{}(where: {{", INDENT, entry_point));
            lines.extend(entries.into_iter().map(|e| format!("{}{}", INDENT.repeat(2), e)));
            lines.push(format!("{}}}) {{", INDENT));
        }
        lines.extend(
            self.selection(plan)
                .into_iter()
                .map(|field| format!("{}{}", INDENT.repeat(2), field)),
        );
        lines.push(format!("{}}}", INDENT));
        lines.push("}".to_string());

        Ok(lines.join("\n"))
    }
}
