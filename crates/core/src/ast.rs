//! Raw AST types produced by the parser.
//!
//! Facts are left unclassified and query/statement markers stay as source
//! symbols; the completion pass turns these into interchange phrases.

use eflint_interchange::{Clauses, ElementType, Expression, Literal, ParentKind};

// ──────────────────────────────────────────────
// Provenance
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

// ──────────────────────────────────────────────
// Raw phrases (pre-completion)
// ──────────────────────────────────────────────

/// The `Identified by` clause of a fact, as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawIdentification {
    /// `Identified by String` / `Identified by Int`
    Type(ElementType),
    /// `Identified by a * b * c`
    Facts(Vec<String>),
    /// `Identified by lower..upper`
    Span { lower: Literal, upper: Literal },
    /// `Identified by A, B, C`
    List(Vec<Literal>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPhrase {
    Fact {
        name: String,
        identification: Option<RawIdentification>,
        clauses: Clauses,
        prov: Provenance,
    },
    Query {
        /// `?` or `?-`
        marker: String,
        expression: Expression,
        prov: Provenance,
    },
    Statement {
        /// `+`, `-` or `~`
        marker: String,
        operand: Expression,
        prov: Provenance,
    },
    Placeholder {
        name: String,
        for_fact: String,
        prov: Provenance,
    },
    Predicate {
        name: String,
        is_invariant: bool,
        expression: Expression,
        prov: Provenance,
    },
    Event {
        name: String,
        related_to: Vec<String>,
        clauses: Clauses,
        prov: Provenance,
    },
    Act {
        name: String,
        actor: String,
        recipient: Option<String>,
        related_to: Vec<String>,
        clauses: Clauses,
        prov: Provenance,
    },
    Duty {
        name: String,
        holder: String,
        claimant: String,
        related_to: Vec<String>,
        clauses: Clauses,
        violated_when: Expression,
        prov: Provenance,
    },
    Extend {
        parent_kind: ParentKind,
        name: String,
        prov: Provenance,
    },
}

impl RawPhrase {
    pub fn prov(&self) -> &Provenance {
        match self {
            RawPhrase::Fact { prov, .. }
            | RawPhrase::Query { prov, .. }
            | RawPhrase::Statement { prov, .. }
            | RawPhrase::Placeholder { prov, .. }
            | RawPhrase::Predicate { prov, .. }
            | RawPhrase::Event { prov, .. }
            | RawPhrase::Act { prov, .. }
            | RawPhrase::Duty { prov, .. }
            | RawPhrase::Extend { prov, .. } => prov,
        }
    }
}
