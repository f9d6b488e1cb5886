use super::{describe, Parser};
use crate::ast::{RawIdentification, RawPhrase};
use crate::error::TranslateError;
use crate::lexer::Token;
use eflint_interchange::{Clauses, ElementType, Expression, Literal, ParentKind};

/// Which clause keywords a declaration accepts.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ClauseSet {
    /// `Derived from`, `Holds when`, `Conditioned by`
    Fact,
    /// The fact clauses plus `Syncs with`, `Creates`, `Terminates`, `Obfuscates`
    Action,
}

impl<'a> Parser<'a> {
    pub(super) fn parse_phrase(&mut self) -> Result<RawPhrase, TranslateError> {
        match self.peek() {
            Token::Fact => self.parse_fact(),
            Token::Question | Token::QuestionMinus => self.parse_query(),
            Token::Plus | Token::Minus | Token::Tilde => self.parse_statement(),
            Token::Placeholder => self.parse_placeholder(),
            Token::Predicate | Token::Invariant => self.parse_predicate(),
            Token::Event => self.parse_event(),
            Token::Act => self.parse_act(),
            Token::Duty => self.parse_duty(),
            Token::Extend => self.parse_extend(),
            other => Err(self.err(format!("expected phrase, got {}", describe(other)))),
        }
    }

    // -- Facts ---------------------------------------------------

    fn parse_fact(&mut self) -> Result<RawPhrase, TranslateError> {
        let prov = self.prov();
        self.advance();
        let name = self.take_ident()?;
        let identification = if self.eat(&Token::IdentifiedBy) {
            Some(self.parse_identification()?)
        } else {
            None
        };
        let mut clauses = Clauses::default();
        while self.parse_clause(&mut clauses, ClauseSet::Fact)? {}
        self.eat(&Token::Dot);
        Ok(RawPhrase::Fact {
            name,
            identification,
            clauses,
            prov,
        })
    }

    fn parse_identification(&mut self) -> Result<RawIdentification, TranslateError> {
        match self.peek().clone() {
            Token::StringType => {
                self.advance();
                Ok(RawIdentification::Type(ElementType::String))
            }
            Token::IntType => {
                self.advance();
                Ok(RawIdentification::Type(ElementType::Int))
            }
            Token::Ident(_) => {
                let mut facts = vec![self.take_ident()?];
                while self.eat(&Token::Star) {
                    facts.push(self.take_ident()?);
                }
                Ok(RawIdentification::Facts(facts))
            }
            Token::Str(_) | Token::Int(_) => {
                let first = self.parse_range_literal()?;
                if self.eat(&Token::DotDot) {
                    let upper = self.parse_range_literal()?;
                    return Ok(RawIdentification::Span {
                        lower: first,
                        upper,
                    });
                }
                let mut values = vec![first];
                while self.eat(&Token::Comma) {
                    values.push(self.parse_range_literal()?);
                }
                Ok(RawIdentification::List(values))
            }
            other => Err(self.err(format!(
                "expected type, fact names or range after 'Identified by', got {}",
                describe(&other)
            ))),
        }
    }

    fn parse_range_literal(&mut self) -> Result<Literal, TranslateError> {
        match self.peek().clone() {
            Token::Str(s) => {
                self.advance();
                Ok(Literal::Str(s))
            }
            Token::Int(n) => {
                self.advance();
                Ok(Literal::Int(n))
            }
            other => Err(self.err(format!("expected literal, got {}", describe(&other)))),
        }
    }

    // -- Clauses -------------------------------------------------

    /// Parse one clause into `clauses` if the current token opens one
    /// allowed by `set`. Returns whether a clause was consumed.
    fn parse_clause(&mut self, clauses: &mut Clauses, set: ClauseSet) -> Result<bool, TranslateError> {
        let target = match self.peek() {
            Token::DerivedFrom => &mut clauses.derived_from,
            Token::HoldsWhen => &mut clauses.holds_when,
            Token::ConditionedBy => &mut clauses.conditioned_by,
            Token::SyncsWith if set == ClauseSet::Action => &mut clauses.syncs_with,
            Token::Creates if set == ClauseSet::Action => &mut clauses.creates,
            Token::Terminates if set == ClauseSet::Action => &mut clauses.terminates,
            Token::Obfuscates if set == ClauseSet::Action => &mut clauses.obfuscates,
            _ => return Ok(false),
        };
        self.advance();
        let exprs = self.parse_expression_list()?;
        target.extend(exprs);
        Ok(true)
    }

    /// `expr ("," expr)*`
    fn parse_expression_list(&mut self) -> Result<Vec<Expression>, TranslateError> {
        let mut exprs = vec![self.parse_expression()?];
        while self.eat(&Token::Comma) {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }

    fn parse_related(&mut self) -> Result<Vec<String>, TranslateError> {
        if self.eat(&Token::RelatedTo) {
            self.take_ident_list()
        } else {
            Ok(Vec::new())
        }
    }

    // -- Queries and statements ----------------------------------

    fn parse_query(&mut self) -> Result<RawPhrase, TranslateError> {
        let prov = self.prov();
        let marker = match self.advance() {
            Token::QuestionMinus => "?-",
            _ => "?",
        };
        let expression = self.parse_expression()?;
        Ok(RawPhrase::Query {
            marker: marker.to_owned(),
            expression,
            prov,
        })
    }

    fn parse_statement(&mut self) -> Result<RawPhrase, TranslateError> {
        let prov = self.prov();
        let marker = match self.advance() {
            Token::Plus => "+",
            Token::Minus => "-",
            _ => "~",
        };
        let operand = self.parse_expression()?;
        Ok(RawPhrase::Statement {
            marker: marker.to_owned(),
            operand,
            prov,
        })
    }

    // -- Declarations --------------------------------------------

    fn parse_placeholder(&mut self) -> Result<RawPhrase, TranslateError> {
        let prov = self.prov();
        self.advance();
        let name = self.take_ident()?;
        self.expect(&Token::For, "'For'")?;
        let for_fact = self.take_ident()?;
        self.eat(&Token::Dot);
        Ok(RawPhrase::Placeholder {
            name,
            for_fact,
            prov,
        })
    }

    fn parse_predicate(&mut self) -> Result<RawPhrase, TranslateError> {
        let prov = self.prov();
        let is_invariant = self.advance() == Token::Invariant;
        let name = self.take_ident()?;
        self.expect(&Token::When, "'When'")?;
        let expression = self.parse_expression()?;
        Ok(RawPhrase::Predicate {
            name,
            is_invariant,
            expression,
            prov,
        })
    }

    fn parse_event(&mut self) -> Result<RawPhrase, TranslateError> {
        let prov = self.prov();
        self.advance();
        let name = self.take_ident()?;
        let related_to = self.parse_related()?;
        let mut clauses = Clauses::default();
        while self.parse_clause(&mut clauses, ClauseSet::Action)? {}
        self.eat(&Token::Dot);
        Ok(RawPhrase::Event {
            name,
            related_to,
            clauses,
            prov,
        })
    }

    fn parse_act(&mut self) -> Result<RawPhrase, TranslateError> {
        let prov = self.prov();
        self.advance();
        let name = self.take_ident()?;
        self.expect(&Token::Actor, "'Actor'")?;
        let actor = self.take_ident()?;
        let recipient = if self.eat(&Token::Recipient) {
            Some(self.take_ident()?)
        } else {
            None
        };
        let related_to = self.parse_related()?;
        let mut clauses = Clauses::default();
        while self.parse_clause(&mut clauses, ClauseSet::Action)? {}
        self.eat(&Token::Dot);
        Ok(RawPhrase::Act {
            name,
            actor,
            recipient,
            related_to,
            clauses,
            prov,
        })
    }

    fn parse_duty(&mut self) -> Result<RawPhrase, TranslateError> {
        let prov = self.prov();
        self.advance();
        let name = self.take_ident()?;
        self.expect(&Token::Holder, "'Holder'")?;
        let holder = self.take_ident()?;
        self.expect(&Token::Claimant, "'Claimant'")?;
        let claimant = self.take_ident()?;
        let related_to = self.parse_related()?;

        let mut clauses = Clauses::default();
        let mut violated_when = None;
        loop {
            if self.peek() == &Token::ViolatedWhen {
                if violated_when.is_some() {
                    return Err(self.err(format!(
                        "duty '{}' has more than one 'Violated when' clause",
                        name
                    )));
                }
                self.advance();
                violated_when = Some(self.parse_expression()?);
                continue;
            }
            if !self.parse_clause(&mut clauses, ClauseSet::Action)? {
                break;
            }
        }
        let Some(violated_when) = violated_when else {
            return Err(self.err(format!(
                "duty '{}' is missing its 'Violated when' clause",
                name
            )));
        };
        self.eat(&Token::Dot);
        Ok(RawPhrase::Duty {
            name,
            holder,
            claimant,
            related_to,
            clauses,
            violated_when,
            prov,
        })
    }

    fn parse_extend(&mut self) -> Result<RawPhrase, TranslateError> {
        let prov = self.prov();
        self.advance();
        let parent_kind = match self.peek() {
            Token::Fact => ParentKind::Fact,
            Token::Act => ParentKind::Act,
            Token::Event => ParentKind::Event,
            Token::Duty => ParentKind::Duty,
            other => {
                return Err(self.err(format!(
                    "expected Fact, Act, Event or Duty after 'Extend', got {}",
                    describe(other)
                )))
            }
        };
        self.advance();
        let name = self.take_ident()?;
        self.eat(&Token::Dot);
        Ok(RawPhrase::Extend {
            parent_kind,
            name,
            prov,
        })
    }
}
