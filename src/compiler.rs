//! Compile entry points.
//!
//! `compile` takes an already-built plan, validates it and renders both
//! targets. `compile_filters` runs the whole pipeline from a candidate filter
//! list: build, rejection check, validation, rendering.

use serde::Serialize;
use thiserror::Error;

use crate::config::CompilerConfig;
use crate::graph_catalog::SchemaModel;
use crate::query_generator::{
    CypherRenderer, GraphQLRenderer, QueryGeneratorError, QueryRenderer, RenderTarget,
    UnresolvedFilterPolicy,
};
use crate::query_planner::{
    validate_plan, LogicalPlan, LogicalPlanError, PlanBuilder, PlanRequest, RejectedFilter,
};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompileError {
    #[error("Plan validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("Rejected candidate filters: {}", .0.join("; "))]
    RejectedFilters(Vec<String>),
    #[error("Plan build error: {0}")]
    Plan(#[from] LogicalPlanError),
    #[error("{target} render failed: {source}")]
    Render {
        target: RenderTarget,
        source: QueryGeneratorError,
    },
}

fn render_with(renderer: &dyn QueryRenderer, plan: &LogicalPlan) -> Result<String, CompileError> {
    renderer
        .render(plan)
        .map_err(|source| CompileError::Render {
            target: renderer.target(),
            source,
        })
}

fn check_plan(plan: &LogicalPlan, schema: &SchemaModel) -> Result<(), CompileError> {
    let findings = validate_plan(plan, schema);
    if findings.is_empty() {
        Ok(())
    } else {
        Err(CompileError::Validation(findings))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledQuery {
    pub graphql: String,
    pub cypher: String,
}

/// Result of `compile_filters`.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub plan: LogicalPlan,
    pub rejected: Vec<RejectedFilter>,
    pub query: CompiledQuery,
}

/// Validate `plan` and render both targets with default options.
pub fn compile(plan: &LogicalPlan, schema: &SchemaModel) -> Result<CompiledQuery, CompileError> {
    compile_with_policy(plan, schema, UnresolvedFilterPolicy::default())
}

pub fn compile_with_policy(
    plan: &LogicalPlan,
    schema: &SchemaModel,
    policy: UnresolvedFilterPolicy,
) -> Result<CompiledQuery, CompileError> {
    check_plan(plan, schema)?;

    let graphql = render_with(
        &GraphQLRenderer::new(schema).with_unresolved_policy(policy),
        plan,
    )?;
    let cypher = render_with(&CypherRenderer::new(schema), plan)?;

    Ok(CompiledQuery { graphql, cypher })
}

/// Render a single target after validation.
pub fn compile_target(
    plan: &LogicalPlan,
    schema: &SchemaModel,
    target: RenderTarget,
    policy: UnresolvedFilterPolicy,
) -> Result<String, CompileError> {
    check_plan(plan, schema)?;

    match target {
        RenderTarget::GraphQL => render_with(
            &GraphQLRenderer::new(schema).with_unresolved_policy(policy),
            plan,
        ),
        RenderTarget::Cypher => render_with(&CypherRenderer::new(schema), plan),
    }
}

/// Build a plan from candidate filters and compile it.
pub fn compile_filters(
    schema: &SchemaModel,
    request: &PlanRequest,
    config: &CompilerConfig,
) -> Result<PipelineOutput, CompileError> {
    let outcome = PlanBuilder::new(schema)
        .with_default_root(config.default_root.clone())
        .with_default_select(config.default_select.clone())
        .build(request)?;

    if config.fail_on_rejected && !outcome.rejected.is_empty() {
        return Err(CompileError::RejectedFilters(
            outcome
                .rejected
                .iter()
                .map(|r| r.reason.to_string())
                .collect(),
        ));
    }

    let query = compile_with_policy(&outcome.plan, schema, config.unresolved_filters)?;
    log::info!(
        "Compiled plan for root {} ({} filters, {} rejected)",
        outcome.plan.root,
        outcome.plan.filters.len(),
        outcome.rejected.len()
    );

    Ok(PipelineOutput {
        plan: outcome.plan,
        rejected: outcome.rejected,
        query,
    })
}
