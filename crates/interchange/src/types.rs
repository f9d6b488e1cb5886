//! Typed model of the eFLINT phrases JSON protocol.
//!
//! The same types serve both directions: the translator in `eflint-core`
//! produces them from source text, and consumers decode them from JSON
//! with [`from_interchange`](crate::from_interchange).

use std::fmt;

// ── Document ────────────────────────────────────────────────────────

/// Top-level protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub version: String,
    pub kind: DocumentKind,
    /// Always empty unless `kind` is [`DocumentKind::Phrases`].
    pub phrases: Vec<Phrase>,
    pub updates: bool,
}

/// The message kind carried in the document's `kind` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Phrases,
    Handshake,
    Ping,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Phrases => "phrases",
            DocumentKind::Handshake => "handshake",
            DocumentKind::Ping => "ping",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "phrases" => Some(DocumentKind::Phrases),
            "handshake" => Some(DocumentKind::Handshake),
            "ping" => Some(DocumentKind::Ping),
            _ => None,
        }
    }

    /// Whether a document of this kind must carry a `phrases` field.
    pub fn expects_phrases(self) -> bool {
        matches!(self, DocumentKind::Phrases)
    }
}

// ── Phrase ──────────────────────────────────────────────────────────

/// One top-level statement: the variant body plus the flags all
/// variants share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    pub stateless: bool,
    pub updates: bool,
    pub body: PhraseBody,
}

impl Phrase {
    pub fn new(body: PhraseBody) -> Self {
        Phrase {
            stateless: false,
            updates: false,
            body,
        }
    }

    /// The wire discriminator for this phrase.
    pub fn kind(&self) -> &'static str {
        self.body.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhraseBody {
    AtomicFact(AtomicFact),
    CompositeFact(CompositeFact),
    Query(Query),
    Statement(Statement),
    Placeholder(Placeholder),
    Predicate(Predicate),
    Event(Event),
    Act(Act),
    Duty(Duty),
    Extend(Extend),
}

impl PhraseBody {
    pub fn kind(&self) -> &'static str {
        match self {
            PhraseBody::AtomicFact(_) => "afact",
            PhraseBody::CompositeFact(_) => "cfact",
            PhraseBody::Query(q) => q.marker.as_str(),
            PhraseBody::Statement(s) => s.marker.as_str(),
            PhraseBody::Placeholder(_) => "placeholder",
            PhraseBody::Predicate(_) => "predicate",
            PhraseBody::Event(_) => "event",
            PhraseBody::Act(_) => "act",
            PhraseBody::Duty(_) => "duty",
            PhraseBody::Extend(_) => "extend",
        }
    }
}

/// Expression lists attached to facts, events, acts and duties.
///
/// Facts only ever populate the first three lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clauses {
    pub derived_from: Vec<Expression>,
    pub holds_when: Vec<Expression>,
    pub conditioned_by: Vec<Expression>,
    pub syncs_with: Vec<Expression>,
    pub creates: Vec<Expression>,
    pub terminates: Vec<Expression>,
    pub obfuscates: Vec<Expression>,
}

impl Clauses {
    /// Wire field names paired with their lists, in emission order.
    pub fn fields(&self) -> [(&'static str, &Vec<Expression>); 7] {
        [
            ("derived-from", &self.derived_from),
            ("holds-when", &self.holds_when),
            ("conditioned-by", &self.conditioned_by),
            ("syncs-with", &self.syncs_with),
            ("creates", &self.creates),
            ("terminates", &self.terminates),
            ("obfuscates", &self.obfuscates),
        ]
    }

    pub(crate) fn fields_mut(&mut self) -> [(&'static str, &mut Vec<Expression>); 7] {
        [
            ("derived-from", &mut self.derived_from),
            ("holds-when", &mut self.holds_when),
            ("conditioned-by", &mut self.conditioned_by),
            ("syncs-with", &mut self.syncs_with),
            ("creates", &mut self.creates),
            ("terminates", &mut self.terminates),
            ("obfuscates", &mut self.obfuscates),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, list)| list.is_empty())
    }
}

/// Element type of an atomic fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    String,
    Int,
}

impl ElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::String => "String",
            ElementType::Int => "Int",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "String" => Some(ElementType::String),
            "Int" => Some(ElementType::Int),
            _ => None,
        }
    }
}

/// A literal permitted in a fact range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Str(String),
    Int(i64),
}

impl Literal {
    pub fn element_type(&self) -> ElementType {
        match self {
            Literal::Str(_) => ElementType::String,
            Literal::Int(_) => ElementType::Int,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => write!(f, "{}", s),
            Literal::Int(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomicFact {
    pub name: String,
    pub element_type: ElementType,
    /// Enumerated instances; empty means unrestricted.
    pub range: Vec<Literal>,
    pub clauses: Clauses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeFact {
    pub name: String,
    pub identified_by: Vec<String>,
    pub clauses: Clauses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMarker {
    /// Boolean query (`?`).
    Bquery,
    /// Instance query (`?-`).
    Iquery,
}

impl QueryMarker {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryMarker::Bquery => "bquery",
            QueryMarker::Iquery => "iquery",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub marker: QueryMarker,
    pub expression: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementMarker {
    Create,
    Terminate,
    Obfuscate,
    Trigger,
}

impl StatementMarker {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementMarker::Create => "create",
            StatementMarker::Terminate => "terminate",
            StatementMarker::Obfuscate => "obfuscate",
            StatementMarker::Trigger => "trigger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub marker: StatementMarker,
    pub operand: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    /// The fact type the placeholder ranges over.
    pub for_fact: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub name: String,
    pub is_invariant: bool,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub related_to: Vec<String>,
    pub clauses: Clauses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Act {
    pub name: String,
    pub actor: String,
    pub recipient: Option<String>,
    pub related_to: Vec<String>,
    pub clauses: Clauses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duty {
    pub name: String,
    pub holder: String,
    pub claimant: String,
    pub related_to: Vec<String>,
    pub clauses: Clauses,
    pub violated_when: Expression,
}

/// Kind of declaration an `Extend` phrase refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    Fact,
    Act,
    Event,
    Duty,
}

impl ParentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParentKind::Fact => "Fact",
            ParentKind::Act => "Act",
            ParentKind::Event => "Event",
            ParentKind::Duty => "Duty",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Fact" => Some(ParentKind::Fact),
            "Act" => Some(ParentKind::Act),
            "Event" => Some(ParentKind::Event),
            "Duty" => Some(ParentKind::Duty),
            _ => None,
        }
    }
}

/// `Extend <kind> <name>`. The extension body has no representation yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extend {
    pub parent_kind: ParentKind,
    pub name: String,
}

// ── Expression ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    Str(String),
    Int(i64),
    Bool(bool),
}

/// An expression tree. On the wire the variant is identified by the
/// JSON shape alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Primitive(Primitive),
    Reference(String),
    Application {
        identifier: String,
        operands: Vec<Expression>,
    },
    /// `right` is `None` for unary operators.
    Operator {
        operator: Operator,
        left: Box<Expression>,
        right: Option<Box<Expression>>,
    },
    Iterator {
        iterator: IteratorKind,
        bind: String,
        body: Box<Expression>,
    },
}

impl Expression {
    pub fn reference(name: impl Into<String>) -> Self {
        Expression::Reference(name.into())
    }

    pub fn int(n: i64) -> Self {
        Expression::Primitive(Primitive::Int(n))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Expression::Primitive(Primitive::Str(s.into()))
    }

    pub fn unary(operator: Operator, operand: Expression) -> Self {
        Expression::Operator {
            operator,
            left: Box::new(operand),
            right: None,
        }
    }

    pub fn binary(operator: Operator, left: Expression, right: Expression) -> Self {
        Expression::Operator {
            operator,
            left: Box::new(left),
            right: Some(Box::new(right)),
        }
    }

    /// Height of the tree. Primitives and references have depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Expression::Primitive(_) | Expression::Reference(_) => 1,
            Expression::Application { operands, .. } => {
                1 + operands.iter().map(Expression::depth).max().unwrap_or(0)
            }
            Expression::Operator { left, right, .. } => {
                1 + left.depth().max(right.as_ref().map_or(0, |r| r.depth()))
            }
            Expression::Iterator { body, .. } => 1 + body.depth(),
        }
    }
}

/// Canonical operator mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Gt,
    Gte,
    Lte,
    And,
    Or,
    Not,
    When,
    Count,
    Sum,
    Min,
    Max,
    Holds,
}

/// Lookup table for [`Operator::from_name`]; lists every variant.
const OPERATOR_NAMES: &[(Operator, &str)] = &[
    (Operator::Add, "ADD"),
    (Operator::Sub, "SUB"),
    (Operator::Mul, "MUL"),
    (Operator::Div, "DIV"),
    (Operator::Mod, "MOD"),
    (Operator::Eq, "EQ"),
    (Operator::Neq, "NEQ"),
    (Operator::Lt, "LT"),
    (Operator::Gt, "GT"),
    (Operator::Gte, "GTE"),
    (Operator::Lte, "LTE"),
    (Operator::And, "AND"),
    (Operator::Or, "OR"),
    (Operator::Not, "NOT"),
    (Operator::When, "WHEN"),
    (Operator::Count, "COUNT"),
    (Operator::Sum, "SUM"),
    (Operator::Min, "MIN"),
    (Operator::Max, "MAX"),
    (Operator::Holds, "HOLDS"),
];

impl Operator {
    pub fn name(self) -> &'static str {
        match self {
            Operator::Add => "ADD",
            Operator::Sub => "SUB",
            Operator::Mul => "MUL",
            Operator::Div => "DIV",
            Operator::Mod => "MOD",
            Operator::Eq => "EQ",
            Operator::Neq => "NEQ",
            Operator::Lt => "LT",
            Operator::Gt => "GT",
            Operator::Gte => "GTE",
            Operator::Lte => "LTE",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
            Operator::When => "WHEN",
            Operator::Count => "COUNT",
            Operator::Sum => "SUM",
            Operator::Min => "MIN",
            Operator::Max => "MAX",
            Operator::Holds => "HOLDS",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        OPERATOR_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(op, _)| *op)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorKind {
    Foreach,
    Exists,
}

impl IteratorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IteratorKind::Foreach => "FOREACH",
            IteratorKind::Exists => "EXISTS",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "FOREACH" => Some(IteratorKind::Foreach),
            "EXISTS" => Some(IteratorKind::Exists),
            _ => None,
        }
    }
}
