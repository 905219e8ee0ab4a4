//! Validates detection fixtures against the frozen JSON schema and checks
//! that schema-valid bodies map onto verdicts.

use authentiscan_contract::{MappingPolicy, verdict_from_body};
use authentiscan_core::FactorKey;
use jsonschema::JSONSchema;
use serde_json::Value;

const SCHEMA: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../contracts/detection-response.schema.json"
);

fn fixture_path(name: &str) -> String {
    format!("{}/../../contracts/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn read(path: &str) -> String {
    std::fs::read_to_string(path).expect("json file should be readable")
}

fn load_json(path: &str) -> Value {
    serde_json::from_str(&read(path)).expect("json file should be valid")
}

fn compile_validator() -> JSONSchema {
    JSONSchema::compile(&load_json(SCHEMA)).expect("schema should compile")
}

#[test]
fn flagged_fixture_matches_schema_and_maps() {
    let path = fixture_path("detection-response.valid.json");
    assert!(
        compile_validator().is_valid(&load_json(&path)),
        "flagged fixture should validate against schema"
    );

    let verdict =
        verdict_from_body(&read(&path), &MappingPolicy::default()).expect("fixture should map");
    assert!(verdict.is_ai_generated);
    assert_eq!(verdict.display_percent(), 91);
    assert_eq!(
        verdict.factors.get(&FactorKey::Artifacts).map(String::as_str),
        Some("Detected")
    );
    assert_eq!(
        verdict.factors.get(&FactorKey::NeuralScore).map(String::as_str),
        Some("0.93")
    );
}

#[test]
fn score_only_fixture_matches_schema_and_maps() {
    let path = fixture_path("detection-response.score-only.valid.json");
    assert!(
        compile_validator().is_valid(&load_json(&path)),
        "score-only fixture should validate against schema"
    );

    let verdict =
        verdict_from_body(&read(&path), &MappingPolicy::default()).expect("fixture should map");
    assert!(!verdict.is_ai_generated);
    assert_eq!(verdict.display_percent(), 82);
}

#[test]
fn invalid_fixture_is_rejected_by_schema_and_mapper() {
    let path = fixture_path("detection-response.invalid.json");
    assert!(
        !compile_validator().is_valid(&load_json(&path)),
        "invalid fixture should fail schema validation"
    );
    assert!(verdict_from_body(&read(&path), &MappingPolicy::default()).is_err());
}
