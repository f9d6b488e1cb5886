//! Completion pass: turns raw phrases into interchange phrases.
//!
//! Classifies facts as atomic or composite, infers the element type of
//! atomic facts, expands and validates ranges, and maps source markers to
//! phrase kinds. Each phrase is completed on its own; no cross-phrase
//! resolution is done.

use crate::ast::{Provenance, RawIdentification, RawPhrase};
use crate::error::TranslateError;
use eflint_interchange::{
    Act, AtomicFact, CompositeFact, Duty, ElementType, Event, Extend, Literal, Phrase, PhraseBody,
    Placeholder, Predicate, Query, QueryMarker, Statement, StatementMarker,
};

/// Largest number of instances a `lower..upper` range may expand to.
pub const MAX_SPAN_LEN: i64 = 100_000;

pub fn complete(raw: Vec<RawPhrase>) -> Result<Vec<Phrase>, TranslateError> {
    raw.into_iter().map(complete_phrase).collect()
}

fn complete_phrase(raw: RawPhrase) -> Result<Phrase, TranslateError> {
    let body = match raw {
        RawPhrase::Fact {
            name,
            identification,
            clauses,
            prov,
        } => complete_fact(name, identification, clauses, &prov)?,
        RawPhrase::Query {
            marker,
            expression,
            prov,
        } => PhraseBody::Query(Query {
            marker: query_marker(&marker, &prov)?,
            expression,
        }),
        RawPhrase::Statement {
            marker,
            operand,
            prov,
        } => PhraseBody::Statement(Statement {
            marker: statement_marker(&marker, &prov)?,
            operand,
        }),
        RawPhrase::Placeholder { name, for_fact, .. } => {
            PhraseBody::Placeholder(Placeholder { name, for_fact })
        }
        RawPhrase::Predicate {
            name,
            is_invariant,
            expression,
            ..
        } => PhraseBody::Predicate(Predicate {
            name,
            is_invariant,
            expression,
        }),
        RawPhrase::Event {
            name,
            related_to,
            clauses,
            ..
        } => PhraseBody::Event(Event {
            name,
            related_to,
            clauses,
        }),
        RawPhrase::Act {
            name,
            actor,
            recipient,
            related_to,
            clauses,
            ..
        } => PhraseBody::Act(Act {
            name,
            actor,
            recipient,
            related_to,
            clauses,
        }),
        RawPhrase::Duty {
            name,
            holder,
            claimant,
            related_to,
            clauses,
            violated_when,
            ..
        } => PhraseBody::Duty(Duty {
            name,
            holder,
            claimant,
            related_to,
            clauses,
            violated_when,
        }),
        RawPhrase::Extend {
            parent_kind, name, ..
        } => PhraseBody::Extend(Extend { parent_kind, name }),
    };
    let phrase = Phrase::new(body);
    tracing::trace!(kind = phrase.kind(), "completed phrase");
    Ok(phrase)
}

fn complete_fact(
    name: String,
    identification: Option<RawIdentification>,
    clauses: eflint_interchange::Clauses,
    prov: &Provenance,
) -> Result<PhraseBody, TranslateError> {
    let (element_type, range) = match identification {
        Some(RawIdentification::Facts(identified_by)) => {
            return Ok(PhraseBody::CompositeFact(CompositeFact {
                name,
                identified_by,
                clauses,
            }))
        }
        None => (ElementType::String, Vec::new()),
        Some(RawIdentification::Type(t)) => (t, Vec::new()),
        Some(RawIdentification::List(values)) => {
            let element_type = homogeneous_type(&name, &values, prov)?;
            (element_type, values)
        }
        Some(RawIdentification::Span { lower, upper }) => {
            (ElementType::Int, expand_span(&name, &lower, &upper, prov)?)
        }
    };
    Ok(PhraseBody::AtomicFact(AtomicFact {
        name,
        element_type,
        range,
        clauses,
    }))
}

/// All listed literals must share one element type, which becomes the
/// fact's type.
fn homogeneous_type(
    name: &str,
    values: &[Literal],
    prov: &Provenance,
) -> Result<ElementType, TranslateError> {
    let Some(first) = values.first() else {
        return Ok(ElementType::String);
    };
    let element_type = first.element_type();
    if let Some(odd) = values.iter().find(|v| v.element_type() != element_type) {
        return Err(semantic(
            prov,
            format!(
                "range of fact '{}' mixes {} and {} values (at '{}')",
                name,
                element_type.as_str(),
                odd.element_type().as_str(),
                odd
            ),
        ));
    }
    Ok(element_type)
}

/// Expand `lower..upper` into every integer from `lower` to `upper`
/// inclusive.
fn expand_span(
    name: &str,
    lower: &Literal,
    upper: &Literal,
    prov: &Provenance,
) -> Result<Vec<Literal>, TranslateError> {
    let (Literal::Int(lo), Literal::Int(hi)) = (lower, upper) else {
        return Err(semantic(
            prov,
            format!(
                "range of fact '{}' must have integer bounds, got '{}..{}'",
                name, lower, upper
            ),
        ));
    };
    if lo > hi {
        return Err(semantic(
            prov,
            format!(
                "range of fact '{}' has lower bound {} above upper bound {}",
                name, lo, hi
            ),
        ));
    }
    let len = hi.checked_sub(*lo).and_then(|d| d.checked_add(1));
    match len {
        Some(len) if len <= MAX_SPAN_LEN => Ok((*lo..=*hi).map(Literal::Int).collect()),
        _ => Err(semantic(
            prov,
            format!(
                "range of fact '{}' spans more than {} values ({}..{})",
                name, MAX_SPAN_LEN, lo, hi
            ),
        )),
    }
}

fn query_marker(symbol: &str, prov: &Provenance) -> Result<QueryMarker, TranslateError> {
    match symbol {
        "?" => Ok(QueryMarker::Bquery),
        "?-" => Ok(QueryMarker::Iquery),
        other => Err(semantic(prov, format!("unknown query marker '{}'", other))),
    }
}

fn statement_marker(symbol: &str, prov: &Provenance) -> Result<StatementMarker, TranslateError> {
    match symbol {
        "+" => Ok(StatementMarker::Create),
        "-" => Ok(StatementMarker::Terminate),
        "~" => Ok(StatementMarker::Obfuscate),
        other => Err(semantic(
            prov,
            format!("unknown statement marker '{}'", other),
        )),
    }
}

fn semantic(prov: &Provenance, message: String) -> TranslateError {
    TranslateError::semantic(&prov.file, prov.line, prov.column, message)
}
