use super::{describe, Parser};
use crate::error::TranslateError;
use crate::lexer::Token;
use eflint_interchange::{Expression, IteratorKind, Operator, Primitive};

/// Deepest expression the parser accepts, counting both nested parsing
/// (parentheses, `!`, operands, bodies, `When` chains) and the height of
/// the resulting tree. At this height a translated document stays under
/// 100 levels of JSON nesting.
pub const MAX_EXPRESSION_DEPTH: usize = 48;

/// Binary operator binding powers as `(left, right, operator)`.
///
/// Every right power exceeds its left power, so all binary operators are
/// left-associative.
fn binding_power(tok: &Token) -> Option<(u8, u8, Operator)> {
    let bp = match tok {
        Token::OrOr => (1, 2, Operator::Or),
        Token::AndAnd => (3, 4, Operator::And),
        Token::EqEq => (5, 6, Operator::Eq),
        Token::Neq => (5, 6, Operator::Neq),
        Token::Lt => (5, 6, Operator::Lt),
        Token::Gt => (5, 6, Operator::Gt),
        Token::Lte => (5, 6, Operator::Lte),
        Token::Gte => (5, 6, Operator::Gte),
        Token::Plus => (7, 8, Operator::Add),
        Token::Minus => (7, 8, Operator::Sub),
        Token::Star => (9, 10, Operator::Mul),
        Token::Slash => (9, 10, Operator::Div),
        Token::Percent => (9, 10, Operator::Mod),
        _ => return None,
    };
    Some(bp)
}

impl<'a> Parser<'a> {
    // -- Expression parsing --------------------------------------

    /// Parse an expression with its terminator: a trailing `.` is consumed,
    /// and `When <expr>` wraps the whole expression in a binary `WHEN`.
    pub(super) fn parse_expression(&mut self) -> Result<Expression, TranslateError> {
        self.descend()?;
        let expr = self.parse_terminated();
        self.depth -= 1;
        self.within_depth(expr?)
    }

    fn parse_terminated(&mut self) -> Result<Expression, TranslateError> {
        let expr = self.parse_climb(0)?;
        if self.eat(&Token::Dot) {
            return Ok(expr);
        }
        if self.eat(&Token::When) {
            let condition = self.parse_expression()?;
            return Ok(Expression::binary(Operator::When, expr, condition));
        }
        Ok(expr)
    }

    fn parse_climb(&mut self, min_power: u8) -> Result<Expression, TranslateError> {
        let mut lhs = self.parse_atom()?;
        while let Some((left, right, operator)) = binding_power(self.peek()) {
            if left < min_power {
                break;
            }
            self.advance();
            let rhs = self.parse_climb(right)?;
            lhs = self.within_depth(Expression::binary(operator, lhs, rhs))?;
        }
        Ok(lhs)
    }

    fn descend(&mut self) -> Result<(), TranslateError> {
        if self.depth >= MAX_EXPRESSION_DEPTH {
            return Err(self.too_deep());
        }
        self.depth += 1;
        Ok(())
    }

    fn within_depth(&self, expr: Expression) -> Result<Expression, TranslateError> {
        if expr.depth() > MAX_EXPRESSION_DEPTH {
            return Err(self.too_deep());
        }
        Ok(expr)
    }

    fn too_deep(&self) -> TranslateError {
        self.err(format!(
            "expression nested too deeply (more than {} levels)",
            MAX_EXPRESSION_DEPTH
        ))
    }

    fn parse_atom(&mut self) -> Result<Expression, TranslateError> {
        match self.peek().clone() {
            Token::Foreach | Token::Exists => {
                let iterator = if self.advance() == Token::Foreach {
                    IteratorKind::Foreach
                } else {
                    IteratorKind::Exists
                };
                let bind = match self.peek().clone() {
                    Token::Ident(name) => {
                        self.advance();
                        name
                    }
                    other => {
                        return Err(self.err(format!(
                            "expected bound variable after {}, got {}",
                            iterator.as_str(),
                            describe(&other)
                        )))
                    }
                };
                self.expect(&Token::Colon, "':'")?;
                let body = self.parse_expression()?;
                Ok(Expression::Iterator {
                    iterator,
                    bind,
                    body: Box::new(body),
                })
            }
            Token::Count | Token::Sum | Token::Min | Token::Max | Token::Holds => {
                let operator = match self.advance() {
                    Token::Count => Operator::Count,
                    Token::Sum => Operator::Sum,
                    Token::Min => Operator::Min,
                    Token::Max => Operator::Max,
                    _ => Operator::Holds,
                };
                self.expect(&Token::LParen, "'('")?;
                if operator != Operator::Holds && self.peek() != &Token::Foreach {
                    return Err(self.err(format!(
                        "expected Foreach inside {}, got {}",
                        operator,
                        describe(self.peek())
                    )));
                }
                let inner = self.parse_expression()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(Expression::unary(operator, inner))
            }
            Token::Ident(identifier) => {
                self.advance();
                if !self.eat(&Token::LParen) {
                    return Ok(Expression::Reference(identifier));
                }
                let mut operands = Vec::new();
                if !self.eat(&Token::RParen) {
                    operands.push(self.parse_expression()?);
                    while self.eat(&Token::Comma) {
                        operands.push(self.parse_expression()?);
                    }
                    self.expect(&Token::RParen, "')'")?;
                }
                Ok(Expression::Application {
                    identifier,
                    operands,
                })
            }
            Token::Str(s) => {
                self.advance();
                Ok(Expression::Primitive(Primitive::Str(s)))
            }
            Token::Int(n) => {
                self.advance();
                Ok(Expression::Primitive(Primitive::Int(n)))
            }
            Token::True => {
                self.advance();
                Ok(Expression::Primitive(Primitive::Bool(true)))
            }
            Token::False => {
                self.advance();
                Ok(Expression::Primitive(Primitive::Bool(false)))
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::Bang => {
                self.advance();
                self.descend()?;
                let operand = self.parse_atom();
                self.depth -= 1;
                Ok(Expression::unary(Operator::Not, operand?))
            }
            other => Err(self.err(format!(
                "no expression alternative matched {}",
                describe(&other)
            ))),
        }
    }
}
