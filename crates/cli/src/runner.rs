//! Conformance suite runner.
//!
//! Convention:
//!   positive/               -- *.eflint + *.expected.json (no error expected)
//!   negative/<stage>/       -- *.eflint + *.expected-error.json, where <stage>
//!                              is lexical, syntactic or semantic
//!
//! Sources are translated under their bare file name so expected errors
//! do not depend on where the suite lives.

use crate::tap::Tap;
use eflint_core::{Stage, TranslateError};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub struct RunResult {
    pub failed: usize,
}

const NEGATIVE_STAGES: [Stage; 3] = [Stage::Lexical, Stage::Syntactic, Stage::Semantic];

pub fn run_suite(suite_dir: &Path) -> RunResult {
    let tap = collect_suite(suite_dir);
    let failed = tap.failure_count();
    tap.finish();
    RunResult { failed }
}

/// Run every test in the suite without printing the report.
pub fn collect_suite(suite_dir: &Path) -> Tap {
    let mut tap = Tap::new();

    run_positive_dir(suite_dir, &mut tap);

    for stage in NEGATIVE_STAGES {
        run_negative_dir(suite_dir, stage, &mut tap);
    }

    tracing::debug!(
        suite = %suite_dir.display(),
        failed = tap.failure_count(),
        "conformance suite finished"
    );
    tap
}

fn run_positive_dir(suite_dir: &Path, tap: &mut Tap) {
    let dir = suite_dir.join("positive");
    if !dir.exists() {
        return;
    }
    for source_path in &glob_eflint_files(&dir) {
        let stem = stem(source_path);
        let test_name = format!("positive/{}", stem);
        let expected_path = dir.join(format!("{}.expected.json", stem));
        if !expected_path.exists() {
            tap.not_ok(
                test_name,
                format!("missing expected file: {}", expected_path.display()),
            );
            continue;
        }
        let expected_json = match read_json(&expected_path) {
            Ok(v) => v,
            Err(e) => {
                tap.not_ok(&test_name, format!("failed to read expected file: {}", e));
                continue;
            }
        };
        match translate_named(source_path) {
            Ok(got) => {
                if json_equal(&got, &expected_json) {
                    tap.ok(&test_name);
                } else {
                    let diff = json_diff(&expected_json, &got);
                    tap.not_ok(&test_name, format!("output mismatch:\n{}", diff));
                }
            }
            Err(e) => {
                tap.not_ok(
                    &test_name,
                    format!("unexpected {} error: {}", e.stage.as_str(), e),
                );
            }
        }
    }
}

fn run_negative_dir(suite_dir: &Path, stage: Stage, tap: &mut Tap) {
    let dir = suite_dir.join("negative").join(stage.as_str());
    if !dir.exists() {
        return;
    }
    for source_path in &glob_eflint_files(&dir) {
        let stem = stem(source_path);
        let test_name = format!("negative/{}/{}", stage.as_str(), stem);
        let expected_path = dir.join(format!("{}.expected-error.json", stem));
        if !expected_path.exists() {
            tap.not_ok(
                test_name,
                format!("missing expected-error file: {}", expected_path.display()),
            );
            continue;
        }
        let expected_error = match read_json(&expected_path) {
            Ok(v) => v,
            Err(e) => {
                tap.not_ok(
                    &test_name,
                    format!("failed to read expected-error file: {}", e),
                );
                continue;
            }
        };
        match translate_named(source_path) {
            Err(got_error) => {
                let got_json = got_error.to_json_value();
                if got_error.stage != stage {
                    tap.not_ok(
                        &test_name,
                        format!(
                            "expected a {} error, got a {} error: {}",
                            stage.as_str(),
                            got_error.stage.as_str(),
                            got_error
                        ),
                    );
                } else if json_equal(&got_json, &expected_error) {
                    tap.ok(&test_name);
                } else {
                    let diff = json_diff(&expected_error, &got_json);
                    tap.not_ok(&test_name, format!("error mismatch:\n{}", diff));
                }
            }
            Ok(_) => {
                tap.not_ok(
                    &test_name,
                    format!(
                        "expected a {} error but translation succeeded",
                        stage.as_str()
                    ),
                );
            }
        }
    }
}

// -- Helpers --

fn translate_named(path: &Path) -> Result<Value, TranslateError> {
    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let src = std::fs::read_to_string(path)
        .map_err(|e| TranslateError::lex(&name, 0, 0, format!("cannot read file: {}", e)))?;
    eflint_core::translate(&src, &name)
}

fn glob_eflint_files(dir: &Path) -> Vec<PathBuf> {
    let mut results = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("eflint") {
                results.push(path);
            }
        }
    }
    results.sort();
    results
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn read_json(path: &Path) -> Result<Value, String> {
    let src = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&src).map_err(|e| format!("invalid JSON in {}: {}", path.display(), e))
}

/// Deep equality of two JSON values, ignoring object key order and
/// normalizing number types.
fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(am), Value::Object(bm)) => {
            if am.len() != bm.len() {
                return false;
            }
            am.iter()
                .all(|(k, v)| bm.get(k).is_some_and(|bv| json_equal(v, bv)))
        }
        (Value::Array(av), Value::Array(bv)) => {
            av.len() == bv.len() && av.iter().zip(bv).all(|(a, b)| json_equal(a, b))
        }
        (Value::Number(an), Value::Number(bn)) => an.as_f64() == bn.as_f64(),
        _ => a == b,
    }
}

fn json_diff(expected: &Value, got: &Value) -> String {
    let exp_str = serde_json::to_string_pretty(expected).unwrap_or_default();
    let got_str = serde_json::to_string_pretty(got).unwrap_or_default();
    format!("--- expected\n{}\n+++ got\n{}", exp_str, got_str)
}
