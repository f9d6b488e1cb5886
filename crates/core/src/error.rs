use serde::{Deserialize, Serialize};

/// The pipeline stage that rejected the input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Unrecognised character sequence.
    Lexical,
    /// Token sequence matching no grammar alternative.
    Syntactic,
    /// Range checks and marker normalization in the completion pass.
    Semantic,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Lexical => "lexical",
            Stage::Syntactic => "syntactic",
            Stage::Semantic => "semantic",
        }
    }
}

/// A translation error. Every stage aborts on the first one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, thiserror::Error)]
#[error("{file}:{line}:{column}: {message}")]
pub struct TranslateError {
    pub stage: Stage,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl TranslateError {
    pub fn new(
        stage: Stage,
        file: &str,
        line: u32,
        column: u32,
        message: impl Into<String>,
    ) -> Self {
        TranslateError {
            stage,
            file: file.to_owned(),
            line,
            column,
            message: message.into(),
        }
    }

    pub fn lex(file: &str, line: u32, column: u32, message: impl Into<String>) -> Self {
        TranslateError::new(Stage::Lexical, file, line, column, message)
    }

    pub fn parse(file: &str, line: u32, column: u32, message: impl Into<String>) -> Self {
        TranslateError::new(Stage::Syntactic, file, line, column, message)
    }

    pub fn semantic(file: &str, line: u32, column: u32, message: impl Into<String>) -> Self {
        TranslateError::new(Stage::Semantic, file, line, column, message)
    }

    /// Serialize to the JSON error report printed by the CLI.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "stage":   self.stage.as_str(),
            "file":    self.file,
            "line":    self.line,
            "column":  self.column,
            "message": self.message,
        })
    }
}
