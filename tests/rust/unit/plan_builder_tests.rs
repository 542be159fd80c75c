use std::collections::HashMap;

use plangraph::query_planner::{
    build_logical_plan, validate_plan, LogicalPlanError, Operator, PlanBuilder, PlanRequest,
    RawFilter,
};
use serde_json::json;

use super::healthcare_schema;

fn request(root: Option<&str>, filters: Vec<RawFilter>) -> PlanRequest {
    PlanRequest {
        root: root.map(str::to_string),
        filters,
        select: Vec::new(),
    }
}

#[test]
fn test_joins_follow_relations_reachable_from_root() {
    let schema = healthcare_schema();

    let outcome = build_logical_plan(&schema, &request(Some("Facility"), vec![])).unwrap();
    let joins: Vec<(&str, &str, &str)> = outcome
        .plan
        .joins
        .iter()
        .map(|j| (j.from_type.as_str(), j.to_type.as_str(), j.via.as_str()))
        .collect();
    assert_eq!(
        joins,
        vec![
            ("Facility", "Location", "location"),
            ("Facility", "Plan", "plansAccepted"),
        ]
    );

    let outcome = build_logical_plan(&schema, &request(Some("Provider"), vec![])).unwrap();
    assert_eq!(outcome.plan.joins.len(), 8);
    assert_eq!(outcome.plan.joins[2].via, "primaryFacility");
    assert_eq!(outcome.plan.joins[3].via, "facility");
}

#[test]
fn test_root_defaults() {
    let schema = healthcare_schema();

    let outcome = build_logical_plan(&schema, &PlanRequest::default()).unwrap();
    assert_eq!(outcome.plan.root, "Provider");

    let outcome = PlanBuilder::new(&schema)
        .with_default_root(Some("location".to_string()))
        .build(&PlanRequest::default())
        .unwrap();
    assert_eq!(outcome.plan.root, "Location");

    let err = build_logical_plan(&schema, &request(Some("Clinic"), vec![])).unwrap_err();
    assert_eq!(err, LogicalPlanError::UnknownRootType("Clinic".to_string()));
}

#[test]
fn test_default_select_applies_only_when_none_requested() {
    let schema = healthcare_schema();
    let mut defaults = HashMap::new();
    defaults.insert(
        "Provider".to_string(),
        vec!["providerId".to_string(), "name".to_string()],
    );
    let builder = PlanBuilder::new(&schema).with_default_select(defaults);

    let outcome = builder.build(&request(Some("Provider"), vec![])).unwrap();
    assert_eq!(outcome.plan.select, vec!["providerId", "name"]);

    let explicit = PlanRequest {
        root: Some("Provider".to_string()),
        filters: vec![],
        select: vec!["NPI".to_string(), "npi".to_string()],
    };
    let outcome = builder.build(&explicit).unwrap();
    assert_eq!(outcome.plan.select, vec!["npi"]);
}

#[test]
fn test_mixed_candidates() {
    let schema = healthcare_schema();
    let filters = vec![
        RawFilter::new("location.STATE", "in", json!(["TX", "CA"])),
        RawFilter::new("Location.state", "in", json!(["TX", "CA"])),
        RawFilter::new("Plan.carrier", "==", "Aetna"),
        RawFilter::new("Facility.location", "eq", "Austin"),
        RawFilter::new("Location.zip", "eq", json!({"prefix": "787"})),
        RawFilter::new("Pharmacy.name", "eq", "CVS"),
        RawFilter::new("Appointment.availabilityStatus", "between", "open"),
    ];

    let outcome = build_logical_plan(&schema, &request(Some("Provider"), filters)).unwrap();
    let paths: Vec<&str> = outcome
        .plan
        .filters
        .iter()
        .map(|f| f.field_path.as_str())
        .collect();
    assert_eq!(
        paths,
        vec![
            "Location.state",
            "Plan.carrier",
            "Appointment.availabilityStatus"
        ]
    );
    assert_eq!(outcome.plan.filters[0].operator, Operator::In);
    assert_eq!(outcome.plan.filters[1].operator, Operator::Equal);
    assert_eq!(
        outcome.plan.filters[2].operator,
        Operator::Unknown("between".to_string())
    );

    assert_eq!(
        outcome.rejected_paths(),
        vec!["Facility.location", "Location.zip", "Pharmacy.name"]
    );
    assert!(matches!(
        outcome.rejected[1].reason,
        LogicalPlanError::UnsupportedValue { .. }
    ));

    assert!(validate_plan(&outcome.plan, &schema).is_empty());
}

#[test]
fn test_unreachable_type_is_rejected_from_non_provider_root() {
    let schema = healthcare_schema();
    let filters = vec![
        RawFilter::new("Provider.name", "eq", "Smith"),
        RawFilter::new("Location.city", "eq", "Austin"),
    ];
    let outcome = build_logical_plan(&schema, &request(Some("Facility"), filters)).unwrap();
    assert_eq!(outcome.plan.filters.len(), 1);
    assert_eq!(outcome.rejected_paths(), vec!["Provider.name"]);
    assert!(outcome.rejected[0].reason.to_string().contains("unreachable"));
}
