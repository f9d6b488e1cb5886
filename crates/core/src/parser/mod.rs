//! Phrase and expression parser over the token stream.
//! Phrases carry provenance (file, line and column of the opening token).
//! Facts are not classified here -- that is the completion pass's job.

use crate::ast::{Provenance, RawPhrase};
use crate::error::TranslateError;
use crate::lexer::{Spanned, Token};

mod expressions;
mod phrases;

pub use expressions::MAX_EXPRESSION_DEPTH;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    filename: String,
    /// Current expression nesting, see `MAX_EXPRESSION_DEPTH`.
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned], filename: &str) -> Self {
        Parser {
            tokens,
            pos: 0,
            filename: filename.to_owned(),
            depth: 0,
        }
    }

    fn cur(&self) -> Option<&Spanned> {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
    }

    fn peek(&self) -> &Token {
        self.cur().map(|s| &s.token).unwrap_or(&Token::Eof)
    }

    fn position(&self) -> (u32, u32) {
        self.cur().map(|s| (s.line, s.column)).unwrap_or((1, 1))
    }

    fn prov(&self) -> Provenance {
        let (line, column) = self.position();
        Provenance {
            file: self.filename.clone(),
            line,
            column,
        }
    }

    fn advance(&mut self) -> Token {
        let t = self.peek().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    /// Consume the current token if it equals `tok`.
    fn eat(&mut self, tok: &Token) -> bool {
        if self.peek() == tok {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: &Token, what: &str) -> Result<(), TranslateError> {
        if self.eat(tok) {
            Ok(())
        } else {
            Err(self.err(format!("expected {}, got {}", what, describe(self.peek()))))
        }
    }

    fn err(&self, msg: impl Into<String>) -> TranslateError {
        let (line, column) = self.position();
        TranslateError::parse(&self.filename, line, column, msg)
    }

    fn take_ident(&mut self) -> Result<String, TranslateError> {
        if let Token::Ident(name) = self.peek().clone() {
            self.advance();
            Ok(name)
        } else {
            Err(self.err(format!("expected identifier, got {}", describe(self.peek()))))
        }
    }

    /// `ident ("," ident)*`
    fn take_ident_list(&mut self) -> Result<Vec<String>, TranslateError> {
        let mut names = vec![self.take_ident()?];
        while self.eat(&Token::Comma) {
            names.push(self.take_ident()?);
        }
        Ok(names)
    }

    fn parse_document(&mut self) -> Result<Vec<RawPhrase>, TranslateError> {
        let mut phrases = Vec::new();
        while self.peek() != &Token::Eof {
            phrases.push(self.parse_phrase()?);
        }
        Ok(phrases)
    }
}

/// Human-readable token description for error messages.
fn describe(tok: &Token) -> String {
    match tok {
        Token::Ident(name) => format!("identifier '{}'", name),
        Token::Str(s) => format!("string '{}'", s),
        Token::Int(n) => format!("integer {}", n),
        Token::Eof => "end of input".to_owned(),
        other => format!("{:?}", other),
    }
}

pub fn parse(tokens: &[Spanned], filename: &str) -> Result<Vec<RawPhrase>, TranslateError> {
    let mut p = Parser::new(tokens, filename);
    p.parse_document()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::RawIdentification;
    use crate::error::Stage;
    use crate::lexer;
    use eflint_interchange::{ElementType, Expression, Literal, Operator, ParentKind};

    fn parse_src(src: &str) -> Result<Vec<RawPhrase>, TranslateError> {
        let tokens = lexer::lex(src, "test.eflint")?;
        parse(&tokens, "test.eflint")
    }

    fn single(src: &str) -> RawPhrase {
        let mut phrases = parse_src(src).unwrap();
        assert_eq!(phrases.len(), 1, "expected one phrase in {:?}", src);
        phrases.remove(0)
    }

    #[test]
    fn empty_document_has_no_phrases() {
        assert!(parse_src("").unwrap().is_empty());
        assert!(parse_src("// only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn fact_identifications() {
        match single("Fact person Identified by String.") {
            RawPhrase::Fact { identification, .. } => {
                assert_eq!(identification, Some(RawIdentification::Type(ElementType::String)))
            }
            other => panic!("unexpected {:?}", other),
        }
        match single("Fact owns Identified by person * thing") {
            RawPhrase::Fact { identification, .. } => assert_eq!(
                identification,
                Some(RawIdentification::Facts(vec!["person".into(), "thing".into()]))
            ),
            other => panic!("unexpected {:?}", other),
        }
        match single("Fact age Identified by 1..5.") {
            RawPhrase::Fact { identification, .. } => assert_eq!(
                identification,
                Some(RawIdentification::Span {
                    lower: Literal::Int(1),
                    upper: Literal::Int(5),
                })
            ),
            other => panic!("unexpected {:?}", other),
        }
        match single("Fact colour Identified by Red, Green, Blue.") {
            RawPhrase::Fact { identification, .. } => assert_eq!(
                identification,
                Some(RawIdentification::List(vec![
                    Literal::Str("Red".into()),
                    Literal::Str("Green".into()),
                    Literal::Str("Blue".into()),
                ]))
            ),
            other => panic!("unexpected {:?}", other),
        }
        match single("Fact bare") {
            RawPhrase::Fact { identification, .. } => assert_eq!(identification, None),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn fact_clauses_accumulate_in_any_order() {
        match single("Fact a Holds when b, c Derived from d Holds when e.") {
            RawPhrase::Fact { clauses, .. } => {
                assert_eq!(
                    clauses.holds_when,
                    vec![
                        Expression::reference("b"),
                        Expression::reference("c"),
                        Expression::reference("e"),
                    ]
                );
                assert_eq!(clauses.derived_from, vec![Expression::reference("d")]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn facts_reject_action_clauses() {
        let err = parse_src("Fact a Creates b.").unwrap_err();
        assert_eq!(err.stage, Stage::Syntactic);
    }

    #[test]
    fn queries_and_statements_keep_markers() {
        let phrases = parse_src("?x. ?-y. +a. -b. ~c.").unwrap();
        let markers: Vec<&str> = phrases
            .iter()
            .map(|p| match p {
                RawPhrase::Query { marker, .. } | RawPhrase::Statement { marker, .. } => {
                    marker.as_str()
                }
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(markers, vec!["?", "?-", "+", "-", "~"]);
    }

    #[test]
    fn placeholder_and_predicates() {
        match single("Placeholder buyer For person.") {
            RawPhrase::Placeholder { name, for_fact, .. } => {
                assert_eq!(name, "buyer");
                assert_eq!(for_fact, "person");
            }
            other => panic!("unexpected {:?}", other),
        }
        match single("Invariant solvent When balance >= 0.") {
            RawPhrase::Predicate {
                name,
                is_invariant,
                expression,
                ..
            } => {
                assert_eq!(name, "solvent");
                assert!(is_invariant);
                assert_eq!(
                    expression,
                    Expression::binary(
                        Operator::Gte,
                        Expression::reference("balance"),
                        Expression::int(0)
                    )
                );
            }
            other => panic!("unexpected {:?}", other),
        }
        match single("Predicate ready When True.") {
            RawPhrase::Predicate { is_invariant, .. } => assert!(!is_invariant),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn act_with_recipient_and_relations() {
        match single("Act sell Actor seller Recipient buyer Related to item, price Creates owns(buyer, item).") {
            RawPhrase::Act {
                name,
                actor,
                recipient,
                related_to,
                clauses,
                ..
            } => {
                assert_eq!(name, "sell");
                assert_eq!(actor, "seller");
                assert_eq!(recipient.as_deref(), Some("buyer"));
                assert_eq!(related_to, vec!["item".to_owned(), "price".to_owned()]);
                assert_eq!(clauses.creates.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn event_takes_action_clauses() {
        match single("Event tick Terminates a Obfuscates b Syncs with c.") {
            RawPhrase::Event { clauses, .. } => {
                assert_eq!(clauses.terminates.len(), 1);
                assert_eq!(clauses.obfuscates.len(), 1);
                assert_eq!(clauses.syncs_with.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn duty_requires_exactly_one_violation_condition() {
        match single("Duty pay Holder buyer Claimant seller Holds when sold Violated when late.") {
            RawPhrase::Duty {
                violated_when,
                clauses,
                ..
            } => {
                assert_eq!(violated_when, Expression::reference("late"));
                assert_eq!(clauses.holds_when, vec![Expression::reference("sold")]);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse_src("Duty pay Holder a Claimant b.").is_err());
        assert!(parse_src("Duty pay Holder a Claimant b Violated when x Violated when y.").is_err());
    }

    #[test]
    fn extend_names_its_parent_kind() {
        match single("Extend Act sell.") {
            RawPhrase::Extend {
                parent_kind, name, ..
            } => {
                assert_eq!(parent_kind, ParentKind::Act);
                assert_eq!(name, "sell");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse_src("Extend Predicate p.").is_err());
    }

    #[test]
    fn phrases_record_their_opening_position() {
        let phrases = parse_src("Fact a.\n\n  ?a.").unwrap();
        assert_eq!(phrases[1].prov().line, 3);
        assert_eq!(phrases[1].prov().column, 3);
    }

    #[test]
    fn unknown_phrase_start_is_a_syntax_error() {
        let err = parse_src("Fact a.\nAlice").unwrap_err();
        assert_eq!(err.stage, Stage::Syntactic);
        assert_eq!(err.line, 2);
    }
}
