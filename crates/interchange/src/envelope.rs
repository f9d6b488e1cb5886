//! Auxiliary protocol envelopes: the capability handshake and the
//! success/result/error output message.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Identity and capabilities advertised in the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonerInfo {
    pub name: String,
    pub version: String,
    pub supported_versions: Vec<String>,
    pub shares_updates: bool,
    pub shares_triggers: bool,
}

impl Default for ReasonerInfo {
    fn default() -> Self {
        ReasonerInfo {
            name: crate::REASONER.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            supported_versions: vec![crate::PROTOCOL_VERSION.to_owned()],
            shares_updates: true,
            shares_triggers: true,
        }
    }
}

/// The handshake response. `shares-violations` is not supported and is
/// always reported as false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Handshake {
    pub success: bool,
    pub supported_versions: Vec<String>,
    pub reasoner: String,
    pub reasoner_version: String,
    pub shares_updates: bool,
    pub shares_triggers: bool,
    pub shares_violations: bool,
}

impl Handshake {
    pub fn new(info: &ReasonerInfo) -> Self {
        Handshake {
            success: true,
            supported_versions: info.supported_versions.clone(),
            reasoner: info.name.clone(),
            reasoner_version: info.version.clone(),
            shares_updates: info.shares_updates,
            shares_triggers: info.shares_triggers,
            shares_violations: false,
        }
    }
}

/// Serialize the handshake for `info` to JSON.
pub fn handshake(info: &ReasonerInfo) -> Value {
    let h = Handshake::new(info);
    json!({
        "success": h.success,
        "supported-versions": h.supported_versions,
        "reasoner": h.reasoner,
        "reasoner-version": h.reasoner_version,
        "shares-updates": h.shares_updates,
        "shares-triggers": h.shares_triggers,
        "shares-violations": h.shares_violations,
    })
}

/// The output message: a success flag and either results or errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Results and errors collected over one unit of work.
///
/// Owned by the caller and consumed by [`Outcome::into_output`]; nothing
/// is shared between separate outcomes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    results: Vec<Value>,
    errors: Vec<String>,
}

impl Outcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_result(&mut self, result: Value) {
        self.results.push(result);
    }

    pub fn push_error(&mut self, error: impl fmt::Display) {
        self.errors.push(error.to_string());
    }

    /// Push the value or the error of `result`.
    pub fn record<E: fmt::Display>(&mut self, result: Result<Value, E>) {
        match result {
            Ok(v) => self.push_result(v),
            Err(e) => self.push_error(e),
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn results(&self) -> &[Value] {
        &self.results
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Any recorded error makes the output a failure and suppresses the
    /// results.
    pub fn into_output(self) -> Output {
        if self.errors.is_empty() {
            Output {
                success: true,
                results: Some(self.results),
                errors: None,
            }
        } else {
            Output {
                success: false,
                results: None,
                errors: Some(self.errors),
            }
        }
    }
}
