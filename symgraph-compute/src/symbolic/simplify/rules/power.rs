//! Simplification of exponentiations.

use crate::symbolic::expr::SymExpr;
use rug::{ops::Pow, Integer, Rational};

/// The largest integer exponent folded numerically. Anything larger stays symbolic.
const MAX_NUMERIC_EXP: i32 = 4096;

/// `x^0 = 1` (including `0^0 = 1`), `x^1 = x`, `1^x = 1`, `0^n = 0` for positive numeric `n`.
pub fn trivial_power(expr: &SymExpr) -> Option<SymExpr> {
    let SymExpr::Exp(base, exp) = expr else { return None };

    if exp.is_zero() {
        return Some(SymExpr::int(1));
    }
    if exp.is_one() {
        return Some((**base).clone());
    }
    if base.is_one() {
        return Some(SymExpr::int(1));
    }
    if base.is_zero() {
        // a negative exponent is division by zero; that surfaces at evaluation, not here
        if let Some(n) = exp.as_num() {
            if *n > 0u32 {
                return Some(SymExpr::int(0));
            }
        }
    }

    None
}

/// Folds a power of two numbers: integer exponents exactly, fractional exponents only when the
/// base has an exact rational root.
pub fn numeric_power(expr: &SymExpr) -> Option<SymExpr> {
    let SymExpr::Exp(base, exp) = expr else { return None };
    let b = base.as_num()?;
    let e = exp.as_num()?;

    if e.is_integer() {
        let k = e.numer().to_i32()?;
        if k.abs() > MAX_NUMERIC_EXP || (*b == 0u32 && k < 0) {
            return None;
        }
        return Some(SymExpr::num(Rational::from(b.pow(k))));
    }

    // b^(p/q): exact only when the q-th root of b is rational
    let p = e.numer().to_i32()?;
    let q = e.denom().to_u32()?;
    if q > 64 || p.abs() > 64 || *b < 0u32 {
        return None;
    }
    let root = exact_root(b, q)?;
    if root == 0u32 && p < 0 {
        return None;
    }
    Some(SymExpr::num(Rational::from(root.pow(p))))
}

/// `(x^a)^b = x^(a*b)` when `b` is an integer.
pub fn power_of_power(expr: &SymExpr) -> Option<SymExpr> {
    let SymExpr::Exp(base, outer) = expr else { return None };
    let SymExpr::Exp(inner_base, inner) = &**base else { return None };
    let b = outer.as_num()?;
    if !b.is_integer() {
        return None;
    }

    let combined = match inner.as_num() {
        Some(a) => SymExpr::num(Rational::from(a * b)),
        None => SymExpr::mul_flat(vec![(**inner).clone(), SymExpr::num(b.clone())]),
    };
    Some(SymExpr::pow((**inner_base).clone(), combined))
}

/// The exact `q`-th root of a non-negative rational, if it is rational.
pub(crate) fn exact_root(value: &Rational, q: u32) -> Option<Rational> {
    if *value < 0u32 {
        return None;
    }
    let numer = exact_int_root(value.numer(), q)?;
    let denom = exact_int_root(value.denom(), q)?;
    Some(Rational::from((numer, denom)))
}

fn exact_int_root(value: &Integer, q: u32) -> Option<Integer> {
    let root = value.clone().root(q);
    if Integer::from((&root).pow(q)) == *value {
        Some(root)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::rat;

    #[test]
    fn exact_roots() {
        assert_eq!(exact_root(&rat(4), 2), Some(rat(2)));
        assert_eq!(exact_root(&rat((9, 16)), 2), Some(rat((3, 4))));
        assert_eq!(exact_root(&rat(8), 3), Some(rat(2)));
        assert_eq!(exact_root(&rat(2), 2), None);
        assert_eq!(exact_root(&rat(-4), 2), None);
    }
}
