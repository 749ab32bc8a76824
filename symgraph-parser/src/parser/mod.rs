//! A precedence-climbing parser for the restricted algebraic grammar.
//!
//! The grammar knows numbers, symbols, the arithmetic operators, comparison operators, and calls.
//! There are no statements, no assignment, no indexing, and no way to reference anything outside
//! the expression itself; whatever is not in the grammar cannot reach the evaluator. Implicit
//! multiplication is recognized wherever two operands are directly adjacent, binding at the same
//! level as explicit multiplication.

pub mod ast;
pub mod error;
pub mod fmt;
pub mod op;

use ast::{BinOp, Binary, Call, Expr, Literal, LiteralKind, Paren, Unary};
use error::{ReservedWord, UnexpectedEnd, UnexpectedToken, UnknownCharacter};
use op::{Associativity, BinOpKind, Precedence, UnaryOpKind};
use symgraph_error::Error;
use crate::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// Identifiers that are rejected at parse time. An expression naming one of these is trying to be
/// something other than algebra.
pub const RESERVED: &[&str] = &[
    "import", "eval", "exec", "lambda", "open", "system", "compile", "input", "getattr",
];

/// Maps a token to the binary operator it spells, if any.
fn bin_op_kind(kind: TokenKind) -> Option<BinOpKind> {
    match kind {
        TokenKind::Pow | TokenKind::Caret => Some(BinOpKind::Exp),
        TokenKind::Mul => Some(BinOpKind::Mul),
        TokenKind::Div => Some(BinOpKind::Div),
        TokenKind::Add => Some(BinOpKind::Add),
        TokenKind::Sub => Some(BinOpKind::Sub),
        TokenKind::Eq | TokenKind::EqEq => Some(BinOpKind::Eq),
        TokenKind::NotEq => Some(BinOpKind::NotEq),
        TokenKind::Greater => Some(BinOpKind::Greater),
        TokenKind::GreaterEq => Some(BinOpKind::GreaterEq),
        TokenKind::Less => Some(BinOpKind::Less),
        TokenKind::LessEq => Some(BinOpKind::LessEq),
        _ => None,
    }
}

/// Parses one expression out of a normalized source string.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    source: &'source str,
    tokens: Box<[Token<'source>]>,
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Creates a parser over the given source string.
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Parses the source as one complete expression, failing if any input remains afterwards.
    pub fn try_parse_full(&mut self) -> Result<Expr, Error> {
        let expr = self.parse_expr(Precedence::Any)?;

        match self.peek() {
            Some(token) if token.kind == TokenKind::Unknown => Err(Error::new(
                vec![token.span.clone()],
                UnknownCharacter { lexeme: token.lexeme.to_string() },
            )),
            Some(token) => Err(Error::new(
                vec![token.span.clone()],
                UnexpectedToken { lexeme: token.lexeme.to_string() },
            )),
            None => Ok(expr),
        }
    }

    fn peek(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// An empty span at the very end of the source, for reporting unexpected-end errors.
    fn end_span(&self) -> Range<usize> {
        self.source.len()..self.source.len()
    }

    /// Precedence climbing: parse one operand, then keep extending it with operators that bind at
    /// least as tightly as `min`.
    fn parse_expr(&mut self, min: Precedence) -> Result<Expr, Error> {
        let mut lhs = self.parse_unary()?;

        loop {
            let Some((kind, span)) = self.peek().map(|token| (token.kind, token.span.clone()))
            else {
                break;
            };

            if let Some(op_kind) = bin_op_kind(kind) {
                let precedence = op_kind.precedence();
                if precedence < min {
                    break;
                }
                self.cursor += 1;

                let next_min = match op_kind.associativity() {
                    Associativity::Left => precedence.next(),
                    Associativity::Right => precedence,
                };
                let rhs = self.parse_expr(next_min)?;
                let full = lhs.span().start..rhs.span().end;
                lhs = Expr::Binary(Binary {
                    lhs: Box::new(lhs),
                    op: BinOp { kind: op_kind, implicit: false, span },
                    rhs: Box::new(rhs),
                    span: full,
                });
            } else if kind.starts_atom() && Precedence::Factor >= min {
                // no operator, but another operand follows: implicit multiplication
                let op_span = lhs.span().end..span.start;
                let rhs = self.parse_expr(Precedence::Neg)?;
                let full = lhs.span().start..rhs.span().end;
                lhs = Expr::Binary(Binary {
                    lhs: Box::new(lhs),
                    op: BinOp { kind: BinOpKind::Mul, implicit: true, span: op_span },
                    rhs: Box::new(rhs),
                    span: full,
                });
            } else {
                break;
            }
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, Error> {
        let Some(token) = self.peek() else {
            return Err(Error::new(vec![self.end_span()], UnexpectedEnd));
        };

        if token.kind == TokenKind::Sub {
            let op_span = token.span.clone();
            self.cursor += 1;

            // the operand is parsed at `Exp` precedence so the exponent is taken before the sign:
            // `-x**2` is `-(x**2)`
            let operand = self.parse_expr(Precedence::Exp)?;
            let span = op_span.start..operand.span().end;
            return Ok(Expr::Unary(Unary {
                op: UnaryOpKind::Neg,
                op_span,
                operand: Box::new(operand),
                span,
            }));
        }

        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Expr, Error> {
        let Some(token) = self.peek().cloned() else {
            return Err(Error::new(vec![self.end_span()], UnexpectedEnd));
        };

        match token.kind {
            TokenKind::Int | TokenKind::Float => {
                self.cursor += 1;
                let kind = if token.kind == TokenKind::Int {
                    LiteralKind::Integer
                } else {
                    LiteralKind::Float
                };
                Ok(Expr::Literal(Literal {
                    kind,
                    value: token.lexeme.to_string(),
                    span: token.span,
                }))
            },
            TokenKind::Name => {
                if RESERVED.contains(&token.lexeme) || token.lexeme.starts_with("__") {
                    return Err(Error::new(
                        vec![token.span.clone()],
                        ReservedWord { word: token.lexeme.to_string() },
                    ));
                }
                self.cursor += 1;

                // a name followed by `(` is a call, whitespace or not; whether the function
                // exists is decided against the allow-list, never by falling back to
                // multiplication
                let followed_by_paren = self
                    .peek()
                    .map_or(false, |next| next.kind == TokenKind::OpenParen);
                if followed_by_paren {
                    self.parse_call(token)
                } else {
                    Ok(Expr::Literal(Literal {
                        kind: LiteralKind::Symbol,
                        value: token.lexeme.to_string(),
                        span: token.span,
                    }))
                }
            },
            TokenKind::OpenParen => {
                self.cursor += 1;
                let inner = self.parse_expr(Precedence::Any)?;
                let close = self.expect_close_paren()?;
                Ok(Expr::Paren(Paren {
                    inner: Box::new(inner),
                    span: token.span.start..close.end,
                }))
            },
            TokenKind::Unknown => Err(Error::new(
                vec![token.span.clone()],
                UnknownCharacter { lexeme: token.lexeme.to_string() },
            )),
            _ => Err(Error::new(
                vec![token.span.clone()],
                UnexpectedToken { lexeme: token.lexeme.to_string() },
            )),
        }
    }

    /// Parses the argument list of a call whose name token has already been consumed. The cursor
    /// sits on the opening parenthesis.
    fn parse_call(&mut self, name: Token<'source>) -> Result<Expr, Error> {
        self.cursor += 1;
        let mut args = Vec::new();

        if self.peek().map_or(false, |token| token.kind == TokenKind::CloseParen) {
            let close = self.peek().unwrap().span.clone();
            self.cursor += 1;
            return Ok(Expr::Call(Call {
                name: name.lexeme.to_string(),
                name_span: name.span.clone(),
                args,
                span: name.span.start..close.end,
            }));
        }

        loop {
            args.push(self.parse_expr(Precedence::Any)?);

            let Some(token) = self.peek() else {
                return Err(Error::new(vec![self.end_span()], UnexpectedEnd));
            };
            match token.kind {
                TokenKind::Comma => self.cursor += 1,
                TokenKind::CloseParen => {
                    let close = token.span.clone();
                    self.cursor += 1;
                    return Ok(Expr::Call(Call {
                        name: name.lexeme.to_string(),
                        name_span: name.span.clone(),
                        args,
                        span: name.span.start..close.end,
                    }));
                },
                _ => {
                    return Err(Error::new(
                        vec![token.span.clone()],
                        UnexpectedToken { lexeme: token.lexeme.to_string() },
                    ));
                },
            }
        }
    }

    fn expect_close_paren(&mut self) -> Result<Range<usize>, Error> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::CloseParen => {
                let span = token.span.clone();
                self.cursor += 1;
                Ok(span)
            },
            Some(token) => Err(Error::new(
                vec![token.span.clone()],
                UnexpectedToken { lexeme: token.lexeme.to_string() },
            )),
            None => Err(Error::new(vec![self.end_span()], UnexpectedEnd)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Renders the parse tree as an s-expression so tests can assert grouping. Parentheses in the
    /// input are transparent.
    fn tree(expr: &Expr) -> String {
        match expr {
            Expr::Literal(literal) => literal.value.clone(),
            Expr::Paren(paren) => tree(&paren.inner),
            Expr::Unary(unary) => format!("(neg {})", tree(&unary.operand)),
            Expr::Binary(binary) => format!(
                "({} {} {})",
                binary.op.kind,
                tree(&binary.lhs),
                tree(&binary.rhs)
            ),
            Expr::Call(call) => {
                let args = call.args.iter().map(tree).collect::<Vec<_>>().join(" ");
                format!("({} {})", call.name, args)
            },
        }
    }

    fn parse(input: &str) -> String {
        tree(&Parser::new(input).try_parse_full().unwrap())
    }

    #[test]
    fn precedence() {
        assert_eq!(parse("1 + 2 * 3"), "(+ 1 (* 2 3))");
        assert_eq!(parse("1 * 2 + 3"), "(+ (* 1 2) 3)");
        assert_eq!(parse("2 * (x + 1)"), "(* 2 (+ x 1))");
    }

    #[test]
    fn exponent_is_right_associative() {
        assert_eq!(parse("2 ** 3 ** 2"), "(** 2 (** 3 2))");
    }

    #[test]
    fn negation_binds_looser_than_exponent() {
        assert_eq!(parse("-x**2"), "(neg (** x 2))");
        assert_eq!(parse("x**-2"), "(** x (neg 2))");
        assert_eq!(parse("-2*x"), "(* (neg 2) x)");
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(parse("2 x"), "(* 2 x)");
        assert_eq!(parse("2 x y"), "(* (* 2 x) y)");
        assert_eq!(parse("2 (x + 1)"), "(* 2 (+ x 1))");
    }

    #[test]
    fn calls() {
        assert_eq!(parse("sin(x)"), "(sin x)");
        assert_eq!(parse("f(x, y + 1)"), "(f x (+ y 1))");
        // whitespace before the argument list still spells a call
        assert_eq!(parse("sin (x)"), "(sin x)");
    }

    #[test]
    fn relations() {
        assert_eq!(parse("x = 2"), "(= x 2)");
        assert_eq!(parse("x + 1 >= 0"), "(>= (+ x 1) 0)");
    }

    #[test]
    fn reserved_words_are_rejected() {
        let err = Parser::new("import os").try_parse_full().unwrap_err();
        assert!(err.is::<ReservedWord>());

        let err = Parser::new("__class__").try_parse_full().unwrap_err();
        assert!(err.is::<ReservedWord>());
    }

    #[test]
    fn garbage_is_rejected() {
        let err = Parser::new("2 @ 3").try_parse_full().unwrap_err();
        assert!(err.is::<UnknownCharacter>());

        let err = Parser::new("1 +").try_parse_full().unwrap_err();
        assert!(err.is::<UnexpectedEnd>());

        let err = Parser::new("(x + 1").try_parse_full().unwrap_err();
        assert!(err.is::<UnexpectedEnd>());

        let err = Parser::new("").try_parse_full().unwrap_err();
        assert!(err.is::<UnexpectedEnd>());
    }
}
