//! Reduction of expressions to a canonical form.
//!
//! Simplification applies a fixed set of rules (defined in [`rules`]) to the expression,
//! bottom-up, until no rule changes anything. Each rule is a function from `&SymExpr` to
//! `Option<SymExpr>`: `None` means the rule does not apply.
//!
//! Deliberately absent from this set is distribution of products over sums, which lives in
//! [`super::expand`]: a simplifier that distributes would undo [`super::factor`]'s work the
//! moment its output is rendered.

pub mod rules;

use super::expr::{Primary, SymExpr};

/// Simplifies the expression to a fixed point.
pub fn simplify(expr: &SymExpr) -> SymExpr {
    let mut current = simplify_node(expr);
    loop {
        let next = simplify_node(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

/// One bottom-up pass: children first, then rules at this node until none applies.
fn simplify_node(expr: &SymExpr) -> SymExpr {
    let mut current = match expr {
        SymExpr::Add(terms) => {
            SymExpr::add_flat(terms.iter().map(simplify_node).collect())
        },
        SymExpr::Mul(factors) => {
            SymExpr::mul_flat(factors.iter().map(simplify_node).collect())
        },
        SymExpr::Exp(base, exp) => SymExpr::pow(simplify_node(base), simplify_node(exp)),
        SymExpr::Primary(Primary::Call(name, args)) => SymExpr::Primary(Primary::Call(
            name.clone(),
            args.iter().map(simplify_node).collect(),
        )),
        expr => expr.clone(),
    };

    while let Some(next) = rules::apply(&current) {
        current = next;
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fmt::canonical;
    use symgraph_parser::parser::Parser;

    fn simplified(input: &str) -> String {
        let ast = Parser::new(input).try_parse_full().unwrap();
        canonical(&simplify(&SymExpr::from_ast(&ast).unwrap()))
    }

    #[test]
    fn numeric_folding() {
        assert_eq!(simplified("2 + 2"), "4");
        assert_eq!(simplified("2 * 3 + 1"), "7");
        assert_eq!(simplified("4 / 2"), "2");
        assert_eq!(simplified("1 / 3 + 1 / 6"), "1/2");
        assert_eq!(simplified("2 ** 10"), "1024");
    }

    #[test]
    fn like_terms() {
        assert_eq!(simplified("x + x"), "2*x");
        assert_eq!(simplified("x + x + x"), "3*x");
        assert_eq!(simplified("2 * x + 3 * x"), "5*x");
        assert_eq!(simplified("x - x"), "0");
        assert_eq!(simplified("x + 0"), "x");
    }

    #[test]
    fn like_factors() {
        assert_eq!(simplified("x * x"), "x**2");
        assert_eq!(simplified("x * x**2"), "x**3");
        assert_eq!(simplified("x * 0"), "0");
        assert_eq!(simplified("1 * x"), "x");
        assert_eq!(simplified("x / x"), "1");
    }

    #[test]
    fn powers() {
        assert_eq!(simplified("x**0"), "1");
        assert_eq!(simplified("x**1"), "x");
        assert_eq!(simplified("(x**2)**3"), "x**6");
        assert_eq!(simplified("sqrt(4)"), "2");
        assert_eq!(simplified("sqrt(2)"), "sqrt(2)");
        assert_eq!(simplified("9 ** 0.5"), "3");
    }

    #[test]
    fn exact_trigonometry() {
        assert_eq!(simplified("sin(0)"), "0");
        assert_eq!(simplified("cos(0)"), "1");
        assert_eq!(simplified("sin(pi)"), "0");
        assert_eq!(simplified("cos(pi)"), "-1");
        assert_eq!(simplified("sin(pi / 2)"), "1");
        assert_eq!(simplified("sin(3 * pi / 2)"), "-1");
        // no exact value in the table: left alone
        assert_eq!(simplified("sin(1)"), "sin(1)");
    }

    #[test]
    fn already_canonical_input_is_unchanged() {
        assert_eq!(simplified("x**2 + 2*x + 1"), "x**2 + 2*x + 1");
    }
}
