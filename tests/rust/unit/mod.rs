//! Unit tests - component-level tests over the shared healthcare fixture
//!
//! These exercise one layer at a time through the public API.

use plangraph::graph_catalog::SchemaModel;

mod plan_builder_tests;

pub fn fixture_path() -> String {
    format!(
        "{}/tests/fixtures/healthcare_schema.json",
        env!("CARGO_MANIFEST_DIR")
    )
}

pub fn healthcare_schema() -> SchemaModel {
    SchemaModel::from_json_file(fixture_path()).expect("fixture schema should load")
}
