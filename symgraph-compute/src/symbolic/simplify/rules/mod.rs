//! The simplification rule set.
//!
//! Each rule is a function from `&SymExpr` to `Option<SymExpr>`, returning `None` when it does
//! not apply. [`apply`] tries the rules in a fixed order and returns the first change; the driver
//! in [`super`] keeps calling it until a fixed point is reached.

pub mod add;
pub mod call;
pub mod multiply;
pub mod power;

use crate::primitive::rat;
use crate::symbolic::expr::{Primary, SymExpr};
use rug::Rational;

/// Applies the first rule that changes the expression.
pub fn apply(expr: &SymExpr) -> Option<SymExpr> {
    add::combine_terms(expr)
        .or_else(|| multiply::combine_factors(expr))
        .or_else(|| power::trivial_power(expr))
        .or_else(|| power::numeric_power(expr))
        .or_else(|| power::power_of_power(expr))
        .or_else(|| call::sqrt_exact(expr))
        .or_else(|| call::sqrt_partial(expr))
        .or_else(|| call::trig_exact(expr))
}

/// Splits a term into its rational coefficient and the product of its remaining factors.
///
/// - `5` -> `(5, 1)`
/// - `3*x` -> `(3, x)`
/// - `1/4*x*y` -> `(1/4, x*y)`
/// - `x` -> `(1, x)`
pub(crate) fn split_coeff(expr: &SymExpr) -> (Rational, SymExpr) {
    match expr {
        SymExpr::Primary(Primary::Num(n)) => (n.clone(), SymExpr::int(1)),
        SymExpr::Mul(factors) => {
            let mut coeff = rat(1);
            let mut rest = Vec::new();
            for factor in factors {
                match factor.as_num() {
                    Some(n) => coeff *= n,
                    None => rest.push(factor.clone()),
                }
            }
            (coeff, SymExpr::Mul(rest).downgrade())
        },
        expr => (rat(1), expr.clone()),
    }
}
