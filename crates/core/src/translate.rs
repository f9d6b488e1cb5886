//! Translation pipeline: eFLINT source -> phrases document -> wire JSON.
//!
//! Runs the lexer, the parser and the completion pass in order and stops at
//! the first error.

use crate::complete;
use crate::error::TranslateError;
use crate::lexer;
use crate::parser;
use eflint_interchange::{Document, DocumentKind, PROTOCOL_VERSION};
use serde_json::Value;

/// Translate `src` into a typed phrases document stamped with
/// [`PROTOCOL_VERSION`].
pub fn translate_source(src: &str, filename: &str) -> Result<Document, TranslateError> {
    translate_with_version(src, filename, PROTOCOL_VERSION)
}

/// Translate `src` into a phrases document carrying `version`.
pub fn translate_with_version(
    src: &str,
    filename: &str,
    version: &str,
) -> Result<Document, TranslateError> {
    let tokens = lexer::lex(src, filename)?;
    tracing::debug!(file = filename, tokens = tokens.len(), "lexed source");

    let raw = parser::parse(&tokens, filename)?;
    tracing::debug!(file = filename, phrases = raw.len(), "parsed phrases");

    let phrases = complete::complete(raw)?;
    tracing::debug!(file = filename, phrases = phrases.len(), "completed phrases");

    Ok(Document {
        version: version.to_owned(),
        kind: DocumentKind::Phrases,
        phrases,
        updates: true,
    })
}

/// Translate `src` straight to the wire JSON document.
pub fn translate(src: &str, filename: &str) -> Result<Value, TranslateError> {
    let doc = translate_source(src, filename)?;
    Ok(eflint_interchange::to_interchange(&doc))
}

/// Translate the file at `path`. Read failures are reported as lexical
/// errors at 0:0.
pub fn translate_file(path: &std::path::Path) -> Result<Value, TranslateError> {
    let filename = path.display().to_string();
    let src = std::fs::read_to_string(path).map_err(|e| {
        TranslateError::lex(&filename, 0, 0, format!("cannot read file: {}", e))
    })?;
    translate(&src, &filename)
}
