//! eflint-interchange: typed model of the eFLINT phrases JSON protocol.
//!
//! Provides the phrase and expression types shared by the translator and
//! its consumers, the encoder ([`to_interchange`]), the decoder
//! ([`from_interchange`]) and the auxiliary handshake/output envelopes.
//!
//! Decoding is the inverse of encoding: for every document produced by
//! `eflint-core`, `from_interchange(&to_interchange(&doc)) == Ok(doc)`.

/// Protocol version stamped on every emitted document.
pub const PROTOCOL_VERSION: &str = "0.1.0";
/// Default reasoner name advertised in the handshake.
pub const REASONER: &str = "eflint-json";

pub mod deserialize;
pub mod envelope;
pub mod serialize;
pub mod types;

pub use deserialize::{from_interchange, parse_expression, parse_phrase, InterchangeError};
pub use envelope::{handshake, Handshake, Outcome, Output, ReasonerInfo};
pub use serialize::{serialize_expr, serialize_phrase, to_interchange};
pub use types::*;
