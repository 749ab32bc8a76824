//! The abstract syntax tree produced by the parser.
//!
//! Every node carries the span of the normalized source text it was parsed from, so that errors
//! reported by later stages can point back into the expression.

use std::{fmt, ops::Range};
use super::op::{BinOpKind, UnaryOpKind};

/// A literal: a number or a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// What kind of literal this is.
    pub kind: LiteralKind,

    /// The raw lexeme. Numeric values are parsed by the compute layer, which owns the numeric
    /// types.
    pub value: String,

    /// The region of the source text this literal was parsed from.
    pub span: Range<usize>,
}

/// The kinds of literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Integer,
    Float,
    Symbol,
}

/// A parenthesized expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Paren {
    /// The expression inside the parentheses.
    pub inner: Box<Expr>,

    /// The region of the source text, including the parentheses.
    pub span: Range<usize>,
}

/// A unary expression, such as `-x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    /// The kind of operator.
    pub op: UnaryOpKind,

    /// The span of the operator itself.
    pub op_span: Range<usize>,

    /// The operand.
    pub operand: Box<Expr>,

    /// The region of the source text.
    pub span: Range<usize>,
}

/// A binary operator attached to its span, remembering whether the parser inserted it for an
/// implicit multiplication.
#[derive(Debug, Clone, PartialEq)]
pub struct BinOp {
    /// The kind of operator.
    pub kind: BinOpKind,

    /// True when the operator was implied by adjacency rather than written out.
    pub implicit: bool,

    /// The span of the operator (empty for implicit multiplication).
    pub span: Range<usize>,
}

/// A binary expression, such as `1 + 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source text.
    pub span: Range<usize>,
}

/// A function call, such as `sin(x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// The name of the called function.
    pub name: String,

    /// The span of the name.
    pub name_span: Range<usize>,

    /// The arguments to the call.
    pub args: Vec<Expr>,

    /// The region of the source text, including the argument list.
    pub span: Range<usize>,
}

/// Any expression in the grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal number or symbol.
    Literal(Literal),

    /// A parenthesized expression.
    Paren(Paren),

    /// A unary expression.
    Unary(Unary),

    /// A binary expression.
    Binary(Binary),

    /// A function call.
    Call(Call),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span.clone(),
            Expr::Paren(paren) => paren.span.clone(),
            Expr::Unary(unary) => unary.span.clone(),
            Expr::Binary(binary) => binary.span.clone(),
            Expr::Call(call) => call.span.clone(),
        }
    }

    /// Strips any number of wrapping parentheses, returning the innermost expression.
    pub fn innermost(&self) -> &Expr {
        match self {
            Expr::Paren(paren) => paren.inner.innermost(),
            expr => expr,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => write!(f, "{}", literal.value),
            Expr::Paren(paren) => write!(f, "({})", paren.inner),
            Expr::Unary(unary) => write!(f, "-{}", unary.operand),
            Expr::Binary(binary) => {
                if binary.op.implicit {
                    write!(f, "{}{}", binary.lhs, binary.rhs)
                } else {
                    write!(f, "{} {} {}", binary.lhs, binary.op.kind, binary.rhs)
                }
            },
            Expr::Call(call) => {
                write!(f, "{}(", call.name)?;
                let mut args = call.args.iter();
                if let Some(arg) = args.next() {
                    write!(f, "{}", arg)?;
                    for arg in args {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}
