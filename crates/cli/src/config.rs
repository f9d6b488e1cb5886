//! Translator configuration loaded from `eflint --config <file>`.
//!
//! # Example
//!
//! ```toml
//! [document]
//! version = "0.1.0"
//!
//! [reasoner]
//! name = "eflint-json"
//! version = "0.1.0"
//! supported_versions = ["0.1.0"]
//! shares_updates = true
//! shares_triggers = true
//! ```
//!
//! Every section and key is optional.

use std::path::Path;

use eflint_interchange::{ReasonerInfo, PROTOCOL_VERSION};
use serde::{Deserialize, Serialize};

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub document: DocumentSettings,
    /// Identity advertised by `eflint handshake`.
    pub reasoner: ReasonerInfo,
}

/// `[document]` section: settings stamped on translated documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    pub version: String,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        DocumentSettings {
            version: PROTOCOL_VERSION.to_owned(),
        }
    }
}

// ── Functions ─────────────────────────────────────────────────────────────────

/// Read and parse a config TOML file from `path`.
///
/// Returns a human-readable error string on failure.
pub fn read_config(path: &Path) -> Result<Config, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

/// The config at `path`, or the defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(p) => read_config(p),
        None => Ok(Config::default()),
    }
}
