//! Simplification of sums: dropping zeros, folding numeric terms and combining like terms.

use crate::symbolic::expr::{multiset_eq, SymExpr};
use rug::Rational;
use super::split_coeff;

/// Combines the terms of a sum.
///
/// One rule covers the whole family:
///
/// - `a+0 = a` (a zero coefficient drops the term)
/// - `2+3 = 5` (numeric terms share the factor `1`)
/// - `a+a = 2a`, `2a+3a = 5a` (strictly-equal factor parts add their coefficients)
pub fn combine_terms(expr: &SymExpr) -> Option<SymExpr> {
    let SymExpr::Add(terms) = expr else { return None };

    let mut parts: Vec<(Rational, SymExpr)> = Vec::new();
    for term in terms {
        let (coeff, rest) = split_coeff(term);
        match parts.iter_mut().find(|(_, existing)| *existing == rest) {
            Some((existing_coeff, _)) => *existing_coeff += coeff,
            None => parts.push((coeff, rest)),
        }
    }

    let mut rebuilt = Vec::with_capacity(parts.len());
    for (coeff, rest) in parts {
        if coeff == 0u32 {
            continue;
        }
        if rest.is_one() {
            rebuilt.push(SymExpr::num(coeff));
        } else if coeff == 1u32 {
            rebuilt.push(rest);
        } else {
            rebuilt.push(SymExpr::mul_flat(vec![SymExpr::num(coeff), rest]));
        }
    }

    if multiset_eq(&rebuilt, terms) {
        None
    } else {
        Some(SymExpr::Add(rebuilt).downgrade())
    }
}
