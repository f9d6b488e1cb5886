//! Validates translated documents and the positive conformance expectations
//! against the phrases schema at schema/phrases-schema.json.

use std::path::{Path, PathBuf};

fn workspace_path(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(rel)
}

fn validator() -> jsonschema::Validator {
    let schema_path = workspace_path("schema/phrases-schema.json");
    let schema_src = std::fs::read_to_string(&schema_path)
        .unwrap_or_else(|e| panic!("Failed to read schema at {}: {}", schema_path.display(), e));
    let schema_value: serde_json::Value = serde_json::from_str(&schema_src).unwrap();
    jsonschema::validator_for(&schema_value)
        .unwrap_or_else(|e| panic!("Failed to compile schema: {}", e))
}

fn collect_files(dir: &Path, suffix: &str) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.to_string_lossy().ends_with(suffix))
        .collect();
    paths.sort();
    paths
}

#[test]
fn positive_conformance_expectations_match_schema() {
    let validator = validator();
    let dir = workspace_path("conformance/positive");
    let mut failures = Vec::new();
    let mut tested = 0usize;
    for path in collect_files(&dir, ".expected.json") {
        let src = std::fs::read_to_string(&path).unwrap();
        let instance: serde_json::Value = serde_json::from_str(&src).unwrap();
        if let Err(error) = validator.validate(&instance) {
            failures.push(format!("{}: {}", path.display(), error));
        }
        tested += 1;
    }
    assert!(tested > 0, "no expected.json files found in {}", dir.display());
    assert!(failures.is_empty(), "schema failures:\n{}", failures.join("\n"));
}

#[test]
fn translated_conformance_sources_match_schema() {
    let validator = validator();
    let dir = workspace_path("conformance/positive");
    let mut failures = Vec::new();
    for path in collect_files(&dir, ".eflint") {
        let got = eflint_core::translate_file(&path)
            .unwrap_or_else(|e| panic!("{} failed to translate: {}", path.display(), e));
        if let Err(error) = validator.validate(&got) {
            failures.push(format!("{}: {}", path.display(), error));
        }
    }
    assert!(failures.is_empty(), "schema failures:\n{}", failures.join("\n"));
}

#[test]
fn every_phrase_kind_matches_schema() {
    let src = r#"
Fact person Identified by String.
Fact owns Identified by person * thing Holds when True.
Fact level Identified by 1..3 Derived from level(1).
Placeholder who For person.
Predicate busy When Count(Foreach x : owns(x)) > 2.
Invariant sane When !busy.
Event tick Related to person Syncs with tock() Terminates owns(who).
Act give Actor person Recipient who Creates owns(who) Obfuscates level(2).
Duty return Holder who Claimant person Conditioned by Holds(owns) Violated when Exists y : y.
Extend Duty return.
+person(Alice).
-person(Alice).
~level(1).
?Holds(person(Alice)).
?-person.
"#;
    let got = eflint_core::translate(src, "all.eflint").unwrap();
    assert_eq!(got["phrases"].as_array().map(Vec::len), Some(15));
    if let Err(error) = validator().validate(&got) {
        panic!("schema failure: {}", error);
    }
}

#[test]
fn handshake_document_matches_schema() {
    let doc = serde_json::json!({"version": "0.1.0", "kind": "handshake", "updates": false});
    assert!(validator().validate(&doc).is_ok());
    let bad = serde_json::json!({"version": "0.1.0", "kind": "handshake", "phrases": [], "updates": false});
    assert!(validator().validate(&bad).is_err());
}
