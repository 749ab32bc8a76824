//! Simplification of products: dropping ones, folding numeric factors and combining like
//! factors into powers.

use crate::primitive::rat;
use crate::symbolic::expr::{multiset_eq, SymExpr};
use rug::Rational;

/// Combines the factors of a product.
///
/// - `1*a = a`, `2*3 = 6` (numeric factors fold into one coefficient)
/// - `0*a = 0`
/// - `a*a = a^2`, `a*a^2 = a^3` (strictly-equal bases add their exponents)
pub fn combine_factors(expr: &SymExpr) -> Option<SymExpr> {
    let SymExpr::Mul(factors) = expr else { return None };

    let mut coeff = rat(1);
    let mut parts: Vec<(SymExpr, SymExpr)> = Vec::new();
    for factor in factors {
        if let Some(n) = factor.as_num() {
            coeff *= n;
            continue;
        }

        let (base, exp) = match factor {
            SymExpr::Exp(base, exp) => ((**base).clone(), (**exp).clone()),
            factor => (factor.clone(), SymExpr::int(1)),
        };
        match parts.iter_mut().find(|(existing, _)| *existing == base) {
            Some((_, existing_exp)) => {
                *existing_exp = add_exponents(existing_exp, &exp);
            },
            None => parts.push((base, exp)),
        }
    }

    if coeff == 0u32 {
        return Some(SymExpr::int(0));
    }

    let mut rebuilt = Vec::with_capacity(parts.len() + 1);
    if coeff != 1u32 {
        rebuilt.push(SymExpr::num(coeff));
    }
    for (base, exp) in parts {
        if exp.is_zero() {
            continue;
        }
        if exp.is_one() {
            rebuilt.push(base);
        } else {
            rebuilt.push(SymExpr::pow(base, exp));
        }
    }

    if multiset_eq(&rebuilt, factors) {
        None
    } else {
        Some(SymExpr::Mul(rebuilt).downgrade())
    }
}

/// Adds two exponents, numerically when both are numbers.
fn add_exponents(a: &SymExpr, b: &SymExpr) -> SymExpr {
    match (a.as_num(), b.as_num()) {
        (Some(x), Some(y)) => SymExpr::num(Rational::from(x + y)),
        _ => SymExpr::add_flat(vec![a.clone(), b.clone()]),
    }
}
