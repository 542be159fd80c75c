//! Referential-integrity check of a `LogicalPlan` against a schema.
//!
//! The builder already resolves everything it accepts, but plans can also be
//! deserialized or constructed by hand, so every check is repeated here using
//! canonical (case-sensitive) lookup. Findings are collected, never
//! short-circuited; an empty list means the plan is valid.
//!
//! Reachability of a filter's top-level type from the root is a rendering
//! concern and is not checked here: the GraphQL renderer may omit such a
//! filter while the Cypher renderer rejects it.

use crate::graph_catalog::{FieldLookup, FieldResolver, SchemaModel};

use super::LogicalPlan;

pub fn validate_plan(plan: &LogicalPlan, schema: &SchemaModel) -> Vec<String> {
    let mut errors = Vec::new();
    let resolver = FieldResolver::new(schema);
    let root_known = schema.contains_type(&plan.root);

    if !root_known {
        errors.push(format!("Unknown root type: {}", plan.root));
    }

    for join in &plan.joins {
        if !schema.contains_type(&join.from_type) {
            errors.push(format!("Unknown join from type: {}", join.from_type));
        }
        if !schema.contains_type(&join.to_type) {
            errors.push(format!("Unknown join to type: {}", join.to_type));
        }
    }

    for filter in &plan.filters {
        if let Err(e) = resolver.resolve_path(&filter.field_path, FieldLookup::Exact) {
            errors.push(e.to_string());
        }
    }

    if root_known {
        for field in &plan.select {
            match schema.field(&plan.root, field) {
                None => errors.push(format!(
                    "Unknown select field '{}' on root type {}",
                    field, plan.root
                )),
                Some(field_type) if !field_type.is_scalar() => errors.push(format!(
                    "Select field '{}' on root type {} is not scalar",
                    field, plan.root
                )),
                Some(_) => {}
            }
        }
    }

    if !errors.is_empty() {
        log::debug!("validate_plan: {} finding(s) for root {}", errors.len(), plan.root);
    }
    errors
}
