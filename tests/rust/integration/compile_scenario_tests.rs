use plangraph::compiler::{compile, compile_target, CompileError};
use plangraph::query_generator::{QueryGeneratorError, RenderTarget, UnresolvedFilterPolicy};
use plangraph::query_planner::{Filter, LogicalPlan};
use serde_json::json;

use super::{affiliation_schema, healthcare_schema};

#[test]
fn test_active_affiliation_in_los_angeles() {
    let schema = affiliation_schema();
    let plan = LogicalPlan::new("Provider")
        .with_filter(Filter::new("Affiliation.status", "eq", "ACTIVE"))
        .with_filter(Filter::new("Location.city", "eq", "Los Angeles"))
        .with_select(["providerId", "name"]);

    let compiled = compile(&plan, &schema).unwrap();

    assert_eq!(
        compiled.graphql,
        r#"query {
  providers(where: {
    affiliations: { status: { eq: "ACTIVE" } }
    affiliations: { facility: { location: { city: { eq: "Los Angeles" } } } }
  }) {
    providerId
    name
  }
}"#
    );
    assert_eq!(
        compiled.cypher,
        "MATCH (root:Provider)
MATCH (root:Provider)-[:PROVIDER_AFFILIATIONS]->(n1:Affiliation)
MATCH (n1:Affiliation)-[:AFFILIATION_FACILITY]->(n2:Facility)
MATCH (n2:Facility)-[:FACILITY_LOCATION]->(n3:Location)
WHERE n1.status = 'ACTIVE' AND n3.city = 'Los Angeles'
RETURN DISTINCT root.providerId AS providerId, root.name AS name"
    );
}

#[test]
fn test_nested_path_from_chained_top_type() {
    let schema = affiliation_schema();
    let nested = LogicalPlan::new("Provider")
        .with_filter(Filter::new("Affiliation.status", "eq", "ACTIVE"))
        .with_filter(Filter::new(
            "Affiliation.facility.location.city",
            "eq",
            "Los Angeles",
        ))
        .with_select(["providerId", "name"]);
    let by_type = LogicalPlan::new("Provider")
        .with_filter(Filter::new("Affiliation.status", "eq", "ACTIVE"))
        .with_filter(Filter::new("Location.city", "eq", "Los Angeles"))
        .with_select(["providerId", "name"]);

    let compiled = compile(&nested, &schema).unwrap();
    assert!(compiled.graphql.contains(
        r#"    affiliations: { facility: { location: { city: { eq: "Los Angeles" } } } }"#
    ));
    assert!(compiled
        .cypher
        .contains("MATCH (n2:Facility)-[:FACILITY_LOCATION]->(n3:Location)"));
    assert!(compiled
        .cypher
        .contains("WHERE n1.status = 'ACTIVE' AND n3.city = 'Los Angeles'"));
    assert_eq!(compiled, compile(&by_type, &schema).unwrap());
}

#[test]
fn test_in_filter_renders_list_literals() {
    let schema = affiliation_schema();
    let plan = LogicalPlan::new("Provider")
        .with_filter(Filter::new("Location.state", "in", json!(["TX", "CA"])));

    let compiled = compile(&plan, &schema).unwrap();
    assert!(compiled
        .graphql
        .contains(r#"affiliations: { facility: { location: { state: { eq: ["TX", "CA"] } } } }"#));
    assert!(compiled.cypher.contains("WHERE n3.state IN ['TX','CA']"));
    assert!(compiled.cypher.ends_with("RETURN DISTINCT root"));
}

#[test]
fn test_disconnected_filter_type_asymmetry() {
    let schema = affiliation_schema();
    let plan = LogicalPlan::new("Provider")
        .with_filter(Filter::new("Affiliation.status", "eq", "ACTIVE"))
        .with_filter(Filter::new("Pharmacy.name", "eq", "CVS"));

    let graphql = compile_target(
        &plan,
        &schema,
        RenderTarget::GraphQL,
        UnresolvedFilterPolicy::Skip,
    )
    .unwrap();
    assert!(graphql.contains(r#"affiliations: { status: { eq: "ACTIVE" } }"#));
    assert!(!graphql.contains("CVS"));

    let err = compile_target(
        &plan,
        &schema,
        RenderTarget::Cypher,
        UnresolvedFilterPolicy::Skip,
    )
    .unwrap_err();
    match err {
        CompileError::Render {
            target: RenderTarget::Cypher,
            source: QueryGeneratorError::PathResolution(e),
        } => assert_eq!(e.field_path(), Some("Pharmacy.name")),
        other => panic!("unexpected error: {:?}", other),
    }

    let err = compile_target(
        &plan,
        &schema,
        RenderTarget::GraphQL,
        UnresolvedFilterPolicy::Error,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CompileError::Render {
            target: RenderTarget::GraphQL,
            ..
        }
    ));
}

#[test]
fn test_shared_relation_prefix_reuses_aliases() {
    let schema = healthcare_schema();
    let plan = LogicalPlan::new("Provider")
        .with_filter(Filter::new("Affiliation.status", "eq", "ACTIVE"))
        .with_filter(Filter::new("Location.city", "eq", "Los Angeles"))
        .with_filter(Filter::new("Specialty.name", "eq", "Cardiology"))
        .with_filter(Filter::new("Plan.carrier", "eq", "Aetna"))
        .with_filter(Filter::new("Provider.gender", "eq", "F"))
        .with_select(["npi"]);

    let cypher = compile(&plan, &schema).unwrap().cypher;
    assert_eq!(
        cypher,
        "MATCH (root:Provider)
MATCH (root:Provider)-[:PROVIDER_AFFILIATIONS]->(n1:Affiliation)
MATCH (root:Provider)-[:PROVIDER_PRIMARY_FACILITY]->(n2:Facility)
MATCH (n2:Facility)-[:FACILITY_LOCATION]->(n3:Location)
MATCH (root:Provider)-[:PROVIDER_SPECIALTIES]->(n4:Specialty)
MATCH (n2:Facility)-[:FACILITY_PLANS_ACCEPTED]->(n5:Plan)
WHERE n1.status = 'ACTIVE' AND n3.city = 'Los Angeles' AND n4.name = 'Cardiology' AND n5.carrier = 'Aetna' AND root.gender = 'F'
RETURN DISTINCT root.npi AS npi"
    );
}

#[test]
fn test_nested_filter_path_below_top_type() {
    let schema = healthcare_schema();
    let plan = LogicalPlan::new("Provider")
        .with_filter(Filter::new("Appointment.facility.location.city", "eq", "Austin"))
        .with_filter(Filter::new("Appointment.startTime", "gte", "2024-01-01T00:00:00"));

    let compiled = compile(&plan, &schema).unwrap();
    assert!(compiled.graphql.contains(
        r#"appointments: { facility: { location: { city: { eq: "Austin" } } } }"#
    ));
    assert!(compiled
        .graphql
        .contains(r#"appointments: { startTime: { eq: "2024-01-01T00:00:00" } }"#));
    assert!(compiled
        .cypher
        .contains("MATCH (root:Provider)-[:PROVIDER_APPOINTMENTS]->(n1:Appointment)"));
    assert!(compiled
        .cypher
        .contains("MATCH (n1:Appointment)-[:APPOINTMENT_FACILITY]->(n2:Facility)"));
    assert!(compiled
        .cypher
        .contains("WHERE n3.city = 'Austin' AND n1.startTime >= '2024-01-01T00:00:00'"));
}

#[test]
fn test_non_scalar_terminal_is_a_validation_finding() {
    let schema = healthcare_schema();
    let plan =
        LogicalPlan::new("Provider").with_filter(Filter::new("Facility.location", "eq", "Austin"));

    match compile(&plan, &schema).unwrap_err() {
        CompileError::Validation(findings) => {
            assert_eq!(findings.len(), 1);
            assert!(findings[0].contains("Facility.location"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_compile_is_deterministic() {
    let schema = healthcare_schema();
    let plan = LogicalPlan::new("Provider")
        .with_filter(Filter::new("Plan.name", "ne", "Basic"))
        .with_filter(Filter::new("Location.state", "in", json!(["TX", "CA"])))
        .with_filter(Filter::new("Affiliation.role", "eq", "ATTENDING"))
        .with_select(["name", "providerId"]);

    let first = compile(&plan, &schema).unwrap();
    for _ in 0..20 {
        assert_eq!(compile(&plan, &schema).unwrap(), first);
    }
}

#[test]
fn test_unknown_operator_renders_as_equality() {
    let schema = healthcare_schema();
    let plan = LogicalPlan::new("Location").with_filter(Filter::new("Location.zip", "like", "787"));

    let compiled = compile(&plan, &schema).unwrap();
    assert!(compiled.graphql.starts_with("query {\n  locations(where: {"));
    assert!(compiled.graphql.contains(r#"zip: { eq: "787" }"#));
    assert_eq!(
        compiled.cypher,
        "MATCH (root:Location)\nWHERE root.zip = '787'\nRETURN DISTINCT root"
    );
}
