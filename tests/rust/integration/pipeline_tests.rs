use std::collections::HashMap;

use plangraph::compiler::{compile_filters, CompileError};
use plangraph::config::CompilerConfig;
use plangraph::query_generator::UnresolvedFilterPolicy;
use plangraph::query_planner::{LogicalPlan, PlanRequest, RawFilter};
use serde_json::json;

use super::{affiliation_schema, healthcare_schema};

fn lenient() -> CompilerConfig {
    CompilerConfig {
        fail_on_rejected: false,
        ..Default::default()
    }
}

#[test]
fn test_candidate_filters_to_both_queries() {
    let schema = affiliation_schema();
    let request: PlanRequest = serde_json::from_value(json!({
        "root": "provider",
        "filters": [
            { "field_path": "affiliation.Status", "operator": "eq", "value": "ACTIVE" },
            { "field_path": "Location.city", "value": "Los Angeles" },
            { "field_path": "Affiliation.status", "operator": "=", "value": "ACTIVE" }
        ],
        "select": ["providerId", "NAME"]
    }))
    .unwrap();

    let output = compile_filters(&schema, &request, &CompilerConfig::default()).unwrap();

    assert_eq!(output.plan.root, "Provider");
    assert_eq!(output.plan.filters.len(), 2);
    assert_eq!(output.plan.select, vec!["providerId", "name"]);
    assert!(output.rejected.is_empty());
    assert!(output
        .query
        .graphql
        .contains(r#"affiliations: { status: { eq: "ACTIVE" } }"#));
    assert!(output
        .query
        .cypher
        .contains("WHERE n1.status = 'ACTIVE' AND n3.city = 'Los Angeles'"));
}

#[test]
fn test_rejected_candidates_are_reported() {
    let schema = healthcare_schema();
    let request = PlanRequest {
        root: Some("Provider".to_string()),
        filters: vec![
            RawFilter::new("Location.state", "eq", "TX"),
            RawFilter::new("Location.county", "eq", "Travis"),
            RawFilter::new("Hospital.name", "eq", "St. David's"),
        ],
        select: vec![],
    };

    let err = compile_filters(&schema, &request, &CompilerConfig::default()).unwrap_err();
    match err {
        CompileError::RejectedFilters(reasons) => {
            assert_eq!(reasons.len(), 2);
            assert!(reasons[0].contains("'county'"));
            assert!(reasons[1].contains("'Hospital'"));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let output = compile_filters(&schema, &request, &lenient()).unwrap();
    assert_eq!(output.rejected.len(), 2);
    assert_eq!(
        output.query.cypher,
        "MATCH (root:Provider)
MATCH (root:Provider)-[:PROVIDER_PRIMARY_FACILITY]->(n1:Facility)
MATCH (n1:Facility)-[:FACILITY_LOCATION]->(n2:Location)
WHERE n2.state = 'TX'
RETURN DISTINCT root"
    );
}

#[test]
fn test_config_defaults_drive_root_and_select() {
    let schema = healthcare_schema();
    let mut default_select = HashMap::new();
    default_select.insert(
        "Facility".to_string(),
        vec!["facilityId".to_string(), "name".to_string()],
    );
    let config = CompilerConfig {
        default_root: Some("Facility".to_string()),
        default_select,
        ..Default::default()
    };
    let request = PlanRequest {
        filters: vec![RawFilter::new("Plan.carrier", "eq", "Aetna")],
        ..Default::default()
    };

    let output = compile_filters(&schema, &request, &config).unwrap();
    assert_eq!(output.plan.root, "Facility");
    assert_eq!(output.plan.joins.len(), 2);
    assert_eq!(
        output.query.cypher,
        "MATCH (root:Facility)
MATCH (root:Facility)-[:FACILITY_PLANS_ACCEPTED]->(n1:Plan)
WHERE n1.carrier = 'Aetna'
RETURN DISTINCT root.facilityId AS facilityId, root.name AS name"
    );
    assert!(output.query.graphql.contains("plansAccepted: { carrier: { eq: \"Aetna\" } }"));
}

#[test]
fn test_strict_graphql_after_builder_rejections() {
    let schema = affiliation_schema();
    let config = CompilerConfig {
        unresolved_filters: UnresolvedFilterPolicy::Error,
        ..lenient()
    };
    // unreachable types never reach the renderers when built from candidates
    let request = PlanRequest {
        root: Some("Provider".to_string()),
        filters: vec![
            RawFilter::new("Pharmacy.name", "eq", "CVS"),
            RawFilter::new("Facility.name", "eq", "General"),
        ],
        select: vec![],
    };

    let output = compile_filters(&schema, &request, &config).unwrap();
    assert_eq!(output.rejected.len(), 1);
    assert!(output
        .query
        .graphql
        .contains(r#"affiliations: { facility: { name: { eq: "General" } } }"#));
}

#[test]
fn test_plan_json_round_trips_through_compile() {
    let schema = affiliation_schema();
    let plan = LogicalPlan::from_json_str(
        r#"{
        "root": "Provider",
        "filters": [
            { "field_path": "Facility.location.state", "operator": "in", "value": ["TX", "CA"] }
        ],
        "select": ["name"]
    }"#,
    )
    .unwrap();

    let compiled = plangraph::compile(&plan, &schema).unwrap();
    assert!(compiled.cypher.contains("n3.state IN ['TX','CA']"));
    assert!(compiled.cypher.ends_with("RETURN DISTINCT root.name AS name"));
}
