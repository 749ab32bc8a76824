//! Distribution of products and small integer powers over sums.

use super::expr::{Primary, SymExpr};
use super::simplify::simplify;

/// The largest integer power expanded by repeated multiplication.
const MAX_POW_EXPAND: i64 = 16;

/// Expands the expression: distributes products over sums, multiplies out small integer powers
/// of sums, and simplifies the result.
pub fn expand(expr: &SymExpr) -> SymExpr {
    let simplified = simplify(expr);
    let distributed = distribute(&simplified);
    simplify(&distributed)
}

/// The terms of an expression: its children if it is a sum, itself otherwise.
fn terms_of(expr: SymExpr) -> Vec<SymExpr> {
    match expr {
        SymExpr::Add(terms) => terms,
        expr => vec![expr],
    }
}

fn distribute(expr: &SymExpr) -> SymExpr {
    match expr {
        SymExpr::Add(terms) => SymExpr::add_flat(terms.iter().map(distribute).collect()),
        SymExpr::Mul(factors) => {
            // cross-multiply the term lists of every factor
            let mut acc = vec![SymExpr::int(1)];
            for factor in factors {
                let factor_terms = terms_of(distribute(factor));
                let mut next = Vec::with_capacity(acc.len() * factor_terms.len());
                for left in &acc {
                    for right in &factor_terms {
                        next.push(SymExpr::mul_flat(vec![left.clone(), right.clone()]));
                    }
                }
                acc = next;
            }
            SymExpr::add_flat(acc)
        },
        SymExpr::Exp(base, exp) => {
            let base = distribute(base);
            let exp = distribute(exp);

            if matches!(base, SymExpr::Add(_)) {
                if let Some(n) = exp.as_num() {
                    if n.is_integer() {
                        if let Some(k) = n.numer().to_i64() {
                            if (2..=MAX_POW_EXPAND).contains(&k) {
                                let factors = vec![base.clone(); k as usize];
                                return distribute(&SymExpr::Mul(factors));
                            }
                        }
                    }
                }
            }

            SymExpr::pow(base, exp)
        },
        SymExpr::Primary(Primary::Call(name, args)) => SymExpr::Primary(Primary::Call(
            name.clone(),
            args.iter().map(distribute).collect(),
        )),
        expr => expr.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fmt::canonical;
    use symgraph_parser::parser::Parser;

    fn expanded(input: &str) -> String {
        let ast = Parser::new(input).try_parse_full().unwrap();
        canonical(&expand(&SymExpr::from_ast(&ast).unwrap()))
    }

    #[test]
    fn distributes_products() {
        assert_eq!(expanded("2 * (x + 1)"), "2*x + 2");
        assert_eq!(expanded("(x + 1) * (x - 1)"), "x**2 - 1");
        assert_eq!(expanded("(x + 1) * (x + 2)"), "x**2 + 3*x + 2");
    }

    #[test]
    fn expands_integer_powers() {
        assert_eq!(expanded("(x + 1)**2"), "x**2 + 2*x + 1");
        assert_eq!(expanded("(x + y)**2"), "x**2 + 2*x*y + y**2");
    }

    #[test]
    fn leaves_the_rest_alone() {
        assert_eq!(expanded("x + 1"), "x + 1");
        assert_eq!(expanded("sin(x) * 2"), "2*sin(x)");
    }
}
