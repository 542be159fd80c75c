//! Cypher renderer.
//!
//! Every filter path is resolved from the root, its relation steps are bound
//! to node aliases, and its terminal field becomes a predicate:
//!
//! ```text
//! MATCH (root:Provider)
//! MATCH (root:Provider)-[:PROVIDER_AFFILIATIONS]->(n1:Affiliation)
//! MATCH (n1:Affiliation)-[:AFFILIATION_FACILITY]->(n2:Facility)
//! WHERE n1.status = 'ACTIVE' AND n2.name = 'General'
//! RETURN DISTINCT root.providerId AS providerId
//! ```
//!
//! Aliases are assigned `n1, n2, ...` in the order relation paths are first
//! met across the filter list; a path already bound keeps its alias.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::graph_catalog::{
    FieldLookup, FieldResolver, GraphSchemaError, PathResolutionError, PathSegment, SchemaModel,
};
use crate::query_planner::{Filter, LogicalPlan, Operator};

use super::literal::cypher_literal;
use super::{QueryGeneratorResult, QueryRenderer, RenderTarget};

const ROOT_ALIAS: &str = "root";

/// Lower/digit followed by upper: the camelCase word boundary
static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

fn normalize_label(name: &str) -> String {
    CAMEL_BOUNDARY.replace_all(name, "${1}_${2}").to_uppercase()
}

/// Relationship type for the edge `parent_type.field_name`, e.g.
/// `Facility.plansAccepted` → `FACILITY_PLANS_ACCEPTED`.
pub fn relationship_label(parent_type: &str, field_name: &str) -> String {
    format!(
        "{}_{}",
        normalize_label(parent_type),
        normalize_label(field_name)
    )
}

fn cypher_operator(op: &Operator) -> &'static str {
    match op {
        Operator::Equal => "=",
        Operator::NotEqual => "<>",
        Operator::GreaterThan => ">",
        Operator::LessThan => "<",
        Operator::GreaterThanEqual => ">=",
        Operator::LessThanEqual => "<=",
        Operator::In => "IN",
        Operator::Unknown(raw) => {
            log::debug!("Unknown operator '{}' rendered as '='", raw);
            "="
        }
    }
}

#[derive(Debug, Clone)]
struct NodeBinding {
    alias: String,
    type_name: String,
}

/// Render-scoped alias table and clause buffers; one per `render` call.
#[derive(Debug)]
struct CypherRenderContext {
    /// Relation path from the root (field names) → bound node
    aliases: HashMap<Vec<String>, NodeBinding>,
    next_alias: usize,
    match_clauses: Vec<String>,
    conditions: Vec<String>,
}

impl CypherRenderContext {
    fn new(root_type: &str) -> Self {
        let mut aliases = HashMap::new();
        aliases.insert(
            Vec::new(),
            NodeBinding {
                alias: ROOT_ALIAS.to_string(),
                type_name: root_type.to_string(),
            },
        );
        CypherRenderContext {
            aliases,
            next_alias: 1,
            match_clauses: Vec::new(),
            conditions: Vec::new(),
        }
    }

    /// Bind every prefix of `relations`, emitting a MATCH for each new one,
    /// and return the binding of the full path.
    fn ensure_path(&mut self, relations: &[PathSegment]) -> NodeBinding {
        let mut key: Vec<String> = Vec::with_capacity(relations.len());
        let mut parent = self.aliases[&key].clone();

        for segment in relations {
            key.push(segment.field.clone());
            if let Some(bound) = self.aliases.get(&key) {
                parent = bound.clone();
                continue;
            }

            let binding = NodeBinding {
                alias: format!("n{}", self.next_alias),
                type_name: segment.field_type.base_type().to_string(),
            };
            self.next_alias += 1;

            let label = relationship_label(&segment.owner_type, &segment.field);
            log::debug!(
                "Cypher alias {} bound to {} via {}",
                binding.alias,
                key.join("."),
                label
            );
            self.match_clauses.push(format!(
                "MATCH ({}:{})-[:{}]->({}:{})",
                parent.alias, parent.type_name, label, binding.alias, binding.type_name
            ));
            self.aliases.insert(key.clone(), binding.clone());
            parent = binding;
        }
        parent
    }

    fn add_condition(&mut self, alias: &str, field: &str, filter: &Filter) {
        let operator = cypher_operator(&filter.operator);
        let mut literal = cypher_literal(&filter.value);
        if operator == "IN" && !filter.value.is_array() {
            literal = format!("[{}]", literal);
        }
        self.conditions
            .push(format!("{}.{} {} {}", alias, field, operator, literal));
    }
}

pub struct CypherRenderer<'a> {
    schema: &'a SchemaModel,
}

impl<'a> CypherRenderer<'a> {
    pub fn new(schema: &'a SchemaModel) -> Self {
        CypherRenderer { schema }
    }

    fn return_clause(&self, plan: &LogicalPlan) -> QueryGeneratorResult<String> {
        if plan.select.is_empty() {
            return Ok(format!("RETURN DISTINCT {}", ROOT_ALIAS));
        }
        let mut items = Vec::with_capacity(plan.select.len());
        for field in &plan.select {
            if self.schema.field(&plan.root, field).is_none() {
                return Err(PathResolutionError::UnknownField {
                    field_path: format!("{}.{}", plan.root, field),
                    type_name: plan.root.clone(),
                    field: field.clone(),
                }
                .into());
            }
            items.push(format!("{}.{} AS {}", ROOT_ALIAS, field, field));
        }
        Ok(format!("RETURN DISTINCT {}", items.join(", ")))
    }
}

impl QueryRenderer for CypherRenderer<'_> {
    fn target(&self) -> RenderTarget {
        RenderTarget::Cypher
    }

    fn render(&self, plan: &LogicalPlan) -> QueryGeneratorResult<String> {
        if !self.schema.contains_type(&plan.root) {
            return Err(GraphSchemaError::UnknownRootType {
                type_name: plan.root.clone(),
            }
            .into());
        }

        let resolver = FieldResolver::new(self.schema);
        let mut ctx = CypherRenderContext::new(&plan.root);

        for filter in &plan.filters {
            let resolved =
                resolver.resolve_from_root(&plan.root, &filter.field_path, FieldLookup::Exact)?;
            let node = ctx.ensure_path(resolved.relation_segments());
            ctx.add_condition(&node.alias, &resolved.terminal().field, filter);
        }

        let mut clauses = Vec::with_capacity(ctx.match_clauses.len() + 3);
        clauses.push(format!("MATCH ({}:{})", ROOT_ALIAS, plan.root));
        clauses.append(&mut ctx.match_clauses);
        if !ctx.conditions.is_empty() {
            clauses.push(format!("WHERE {}", ctx.conditions.join(" AND ")));
        }
        clauses.push(self.return_clause(plan)?);

        Ok(clauses.join("\n"))
    }
}
