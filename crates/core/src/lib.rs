#![allow(clippy::result_large_err)]
//! eflint-core: eFLINT to phrases JSON translator.
//!
//! Provides the pipeline from eFLINT source text to the phrases JSON
//! document defined in `eflint-interchange`.
//!
//! # Public API
//!
//! - [`translate()`] -- source text to wire JSON
//! - [`translate_source()`] -- source text to a typed [`Document`](eflint_interchange::Document)
//! - [`TranslateError`] -- error type shared by every stage
//! - AST types: [`RawPhrase`], [`RawIdentification`], [`Provenance`]
//!
//! The individual stages ([`lexer::lex`], [`parser::parse`],
//! [`complete::complete`]) are public for selective use.

pub mod ast;
pub mod complete;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod translate;

// ── Convenience re-exports ───────────────────────────────────────────

pub use ast::{Provenance, RawIdentification, RawPhrase};
pub use error::{Stage, TranslateError};
pub use translate::{translate, translate_file, translate_source, translate_with_version};
