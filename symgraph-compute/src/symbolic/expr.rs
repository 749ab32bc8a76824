//! A representation of mathematical expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](symgraph_parser::parser::ast::Expr) type produced by `symgraph-parser` is a
//! recursive enum that mirrors the source text. It is convenient for parsing, but not for
//! algebraic manipulation. This module defines [`SymExpr`], which **flattens** the tree: the
//! expression `x + (y + z)` becomes a single [`SymExpr::Add`] node with three children. Most of
//! the algebraic passes amount to combining children that sit at the same level, which the flat
//! shape makes direct.
//!
//! # Strict equality
//!
//! Deciding whether two expressions are *mathematically* equal is as hard as simplification
//! itself, so the [`PartialEq`] implementation here is **strict equality**: two nodes are equal
//! if they have the same shape and their children are strictly equal, where the children of
//! [`SymExpr::Add`] and [`SymExpr::Mul`] may match in any order. Strict equality never reports a
//! false positive, which is what the combining rules need.
//!
//! Conversion from the AST is also where the allow-list is enforced: a call to a function outside
//! [`crate::funcs`] or a comparison operator inside an algebraic context is rejected here, before
//! any evaluation takes place.

use crate::error::{ArityMismatch, DisallowedFunction, MisplacedRelation};
use crate::funcs;
use crate::primitive::{int_from_str, rat, rat_from_decimal};
use rug::{Float, Rational};
use std::collections::BTreeSet;
use symgraph_error::Error;
use symgraph_parser::parser::ast;
use symgraph_parser::parser::op::{BinOpKind, UnaryOpKind};

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq)]
pub enum Primary {
    /// An exact rational number, such as `2` or `-5/4`. Decimal literals are read exactly
    /// (`3.14` is `157/50`), which keeps every rewriting pass deterministic.
    Num(Rational),

    /// An approximated number at the working precision. Only numeric evaluation produces these.
    Float(Float),

    /// A variable, such as `x`, or the constant `pi`.
    Symbol(String),

    /// A call to an allow-listed function, such as `sin(x)`.
    Call(String, Vec<SymExpr>),
}

/// A mathematical expression with information about its terms and factors.
#[derive(Debug, Clone)]
pub enum SymExpr {
    /// A single term or factor.
    Primary(Primary),

    /// A sum of two or more terms.
    Add(Vec<SymExpr>),

    /// A product of two or more factors.
    Mul(Vec<SymExpr>),

    /// An exponentiation: base and exponent.
    Exp(Box<SymExpr>, Box<SymExpr>),
}

/// Returns true if the two slices contain strictly-equal elements in any order.
pub(crate) fn multiset_eq(a: &[SymExpr], b: &[SymExpr]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut used = vec![false; b.len()];
    'outer: for item in a {
        for (i, candidate) in b.iter().enumerate() {
            if !used[i] && item == candidate {
                used[i] = true;
                continue 'outer;
            }
        }
        return false;
    }

    true
}

impl PartialEq for SymExpr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SymExpr::Primary(a), SymExpr::Primary(b)) => a == b,
            (SymExpr::Add(a), SymExpr::Add(b)) => multiset_eq(a, b),
            (SymExpr::Mul(a), SymExpr::Mul(b)) => multiset_eq(a, b),
            (SymExpr::Exp(base_a, exp_a), SymExpr::Exp(base_b, exp_b)) => {
                base_a == base_b && exp_a == exp_b
            },
            _ => false,
        }
    }
}

impl SymExpr {
    /// An exact rational number.
    pub fn num(value: Rational) -> SymExpr {
        SymExpr::Primary(Primary::Num(value))
    }

    /// A small integer constant.
    pub fn int(value: i64) -> SymExpr {
        SymExpr::num(rat(value))
    }

    /// A symbol.
    pub fn symbol(name: impl Into<String>) -> SymExpr {
        SymExpr::Primary(Primary::Symbol(name.into()))
    }

    /// Returns the rational value of the expression, if it is one.
    pub fn as_num(&self) -> Option<&Rational> {
        match self {
            SymExpr::Primary(Primary::Num(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns true if the expression is the exact number zero.
    pub fn is_zero(&self) -> bool {
        self.as_num().map(|n| *n == 0u32).unwrap_or(false)
    }

    /// Returns true if the expression is the exact number one.
    pub fn is_one(&self) -> bool {
        self.as_num().map(|n| *n == 1u32).unwrap_or(false)
    }

    /// Collapses degenerate sums and products: an empty sum is `0`, an empty product is `1`, and
    /// a sum or product of one child is the child itself.
    pub fn downgrade(self) -> SymExpr {
        match self {
            SymExpr::Add(mut terms) => match terms.len() {
                0 => SymExpr::int(0),
                1 => terms.pop().unwrap(),
                _ => SymExpr::Add(terms),
            },
            SymExpr::Mul(mut factors) => match factors.len() {
                0 => SymExpr::int(1),
                1 => factors.pop().unwrap(),
                _ => SymExpr::Mul(factors),
            },
            expr => expr,
        }
    }

    /// Builds a sum, flattening any sums among the children.
    pub fn add_flat(terms: Vec<SymExpr>) -> SymExpr {
        let mut flat = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                SymExpr::Add(inner) => flat.extend(inner),
                term => flat.push(term),
            }
        }
        SymExpr::Add(flat).downgrade()
    }

    /// Builds a product, flattening any products among the children.
    pub fn mul_flat(factors: Vec<SymExpr>) -> SymExpr {
        let mut flat = Vec::with_capacity(factors.len());
        for factor in factors {
            match factor {
                SymExpr::Mul(inner) => flat.extend(inner),
                factor => flat.push(factor),
            }
        }
        SymExpr::Mul(flat).downgrade()
    }

    /// Builds an exponentiation.
    pub fn pow(base: SymExpr, exp: SymExpr) -> SymExpr {
        SymExpr::Exp(Box::new(base), Box::new(exp))
    }

    /// The negation of the expression, as a product with `-1`.
    pub fn neg(self) -> SymExpr {
        SymExpr::mul_flat(vec![SymExpr::int(-1), self])
    }

    /// The reciprocal of the expression, as an exponentiation by `-1`.
    pub fn recip(self) -> SymExpr {
        SymExpr::pow(self, SymExpr::int(-1))
    }

    /// Collects every symbol occurring in the expression, including constants like `pi`.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, symbols: &mut BTreeSet<String>) {
        match self {
            SymExpr::Primary(Primary::Symbol(name)) => {
                symbols.insert(name.clone());
            },
            SymExpr::Primary(Primary::Call(_, args)) => {
                for arg in args {
                    arg.collect_symbols(symbols);
                }
            },
            SymExpr::Primary(_) => {},
            SymExpr::Add(children) | SymExpr::Mul(children) => {
                for child in children {
                    child.collect_symbols(symbols);
                }
            },
            SymExpr::Exp(base, exp) => {
                base.collect_symbols(symbols);
                exp.collect_symbols(symbols);
            },
        }
    }

    /// Returns true if the symbol occurs anywhere in the expression.
    pub fn contains_symbol(&self, name: &str) -> bool {
        match self {
            SymExpr::Primary(Primary::Symbol(symbol)) => symbol == name,
            SymExpr::Primary(Primary::Call(_, args)) => {
                args.iter().any(|arg| arg.contains_symbol(name))
            },
            SymExpr::Primary(_) => false,
            SymExpr::Add(children) | SymExpr::Mul(children) => {
                children.iter().any(|child| child.contains_symbol(name))
            },
            SymExpr::Exp(base, exp) => base.contains_symbol(name) || exp.contains_symbol(name),
        }
    }

    /// Replaces every occurrence of the symbol with the given expression.
    pub fn substitute(&self, name: &str, value: &SymExpr) -> SymExpr {
        match self {
            SymExpr::Primary(Primary::Symbol(symbol)) if symbol == name => value.clone(),
            SymExpr::Primary(Primary::Call(func, args)) => SymExpr::Primary(Primary::Call(
                func.clone(),
                args.iter().map(|arg| arg.substitute(name, value)).collect(),
            )),
            SymExpr::Primary(primary) => SymExpr::Primary(primary.clone()),
            SymExpr::Add(terms) => SymExpr::add_flat(
                terms.iter().map(|term| term.substitute(name, value)).collect(),
            ),
            SymExpr::Mul(factors) => SymExpr::mul_flat(
                factors.iter().map(|factor| factor.substitute(name, value)).collect(),
            ),
            SymExpr::Exp(base, exp) => SymExpr::pow(
                base.substitute(name, value),
                exp.substitute(name, value),
            ),
        }
    }

    /// The total degree of the expression in its symbols, used to order terms for display.
    /// Symbols and calls count as degree one; integer exponents scale the degree of their base.
    pub fn degree(&self) -> i64 {
        match self {
            SymExpr::Primary(Primary::Num(_)) | SymExpr::Primary(Primary::Float(_)) => 0,
            SymExpr::Primary(Primary::Symbol(_)) | SymExpr::Primary(Primary::Call(..)) => 1,
            SymExpr::Add(terms) => terms.iter().map(SymExpr::degree).max().unwrap_or(0),
            SymExpr::Mul(factors) => factors.iter().map(SymExpr::degree).sum(),
            SymExpr::Exp(base, exp) => match exp.as_num() {
                Some(n) if n.is_integer() => {
                    base.degree().saturating_mul(n.numer().to_i64().unwrap_or(1))
                },
                _ => base.degree(),
            },
        }
    }

    /// Converts an AST into a [`SymExpr`], enforcing the allow-list along the way.
    ///
    /// Comparison operators are rejected here: the caller peels a top-level equation off the AST
    /// before converting each side when an equation is expected.
    pub fn from_ast(expr: &ast::Expr) -> Result<SymExpr, Error> {
        match expr {
            ast::Expr::Literal(literal) => Ok(match literal.kind {
                ast::LiteralKind::Integer => SymExpr::num(rat(int_from_str(&literal.value))),
                ast::LiteralKind::Float => SymExpr::num(rat_from_decimal(&literal.value)),
                ast::LiteralKind::Symbol => SymExpr::symbol(literal.value.clone()),
            }),
            ast::Expr::Paren(paren) => SymExpr::from_ast(&paren.inner),
            ast::Expr::Unary(unary) => match unary.op {
                UnaryOpKind::Neg => Ok(SymExpr::from_ast(&unary.operand)?.neg()),
            },
            ast::Expr::Binary(binary) => {
                if binary.op.kind.is_relational() {
                    return Err(Error::new(vec![binary.op.span.clone()], MisplacedRelation));
                }

                let lhs = SymExpr::from_ast(&binary.lhs)?;
                let rhs = SymExpr::from_ast(&binary.rhs)?;
                Ok(match binary.op.kind {
                    BinOpKind::Add => SymExpr::add_flat(vec![lhs, rhs]),
                    BinOpKind::Sub => SymExpr::add_flat(vec![lhs, rhs.neg()]),
                    BinOpKind::Mul => SymExpr::mul_flat(vec![lhs, rhs]),
                    BinOpKind::Div => SymExpr::mul_flat(vec![lhs, rhs.recip()]),
                    BinOpKind::Exp => SymExpr::pow(lhs, rhs),
                    _ => unreachable!("relational operators are rejected above"),
                })
            },
            ast::Expr::Call(call) => {
                let Some(builtin) = funcs::get(&call.name) else {
                    return Err(Error::new(
                        vec![call.name_span.clone()],
                        DisallowedFunction {
                            name: call.name.clone(),
                            suggestions: funcs::suggestions(&call.name),
                        },
                    ));
                };

                if call.args.len() != builtin.arity {
                    return Err(Error::new(
                        vec![call.span.clone()],
                        ArityMismatch {
                            name: call.name.clone(),
                            expected: builtin.arity,
                            given: call.args.len(),
                        },
                    ));
                }

                let args = call
                    .args
                    .iter()
                    .map(SymExpr::from_ast)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SymExpr::Primary(Primary::Call(call.name.clone(), args)))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symgraph_parser::parser::Parser;

    fn convert(input: &str) -> Result<SymExpr, Error> {
        let ast = Parser::new(input).try_parse_full()?;
        SymExpr::from_ast(&ast)
    }

    #[test]
    fn flattening() {
        let expr = convert("x + (y + z)").unwrap();
        assert_eq!(
            expr,
            SymExpr::Add(vec![
                SymExpr::symbol("x"),
                SymExpr::symbol("y"),
                SymExpr::symbol("z"),
            ])
        );
    }

    #[test]
    fn strict_equality_ignores_order() {
        let a = convert("x + y").unwrap();
        let b = convert("y + x").unwrap();
        assert_eq!(a, b);

        let a = convert("x * y").unwrap();
        let b = convert("x + y").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn decimal_literals_are_exact() {
        let expr = convert("0.5").unwrap();
        assert_eq!(expr, SymExpr::num(rat((1, 2))));
    }

    #[test]
    fn unknown_functions_are_disallowed() {
        let err = convert("frobnicate(x)").unwrap_err();
        assert!(err.is::<DisallowedFunction>());

        let err = convert("sin(x, y)").unwrap_err();
        assert!(err.is::<ArityMismatch>());
    }

    #[test]
    fn relations_are_rejected_inside_expressions() {
        let err = convert("2 * (x = 1)").unwrap_err();
        assert!(err.is::<MisplacedRelation>());
    }

    #[test]
    fn substitution() {
        let expr = convert("x**2 + y").unwrap();
        let substituted = expr.substitute("x", &SymExpr::int(3));
        let expected = convert("3**2 + y").unwrap();
        assert_eq!(substituted, expected);
    }
}
