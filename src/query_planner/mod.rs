//! Query planning: turning a query intent into a validated `LogicalPlan`.

pub mod logical_plan;

pub use logical_plan::errors::LogicalPlanError;
pub use logical_plan::{
    build_logical_plan, validate_plan, Filter, FilterValue, Join, LogicalPlan, Operator,
    PlanBuildOutcome, PlanBuilder, PlanRequest, RawFilter, RejectedFilter,
};
