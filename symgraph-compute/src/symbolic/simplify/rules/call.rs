//! Simplification of calls to the allow-listed functions: exact square roots and the exact
//! values of the trigonometric functions at multiples of half pi.

use crate::consts;
use crate::primitive::{int, rat};
use crate::symbolic::expr::{Primary, SymExpr};
use rug::{Integer, Rational};
use super::power::exact_root;

/// The bound up to which square factors are searched by trial division.
const SQUARE_TRIAL_BOUND: i32 = 1000;

/// `sqrt(n) = r` when `n` is a non-negative rational with a rational square root.
pub fn sqrt_exact(expr: &SymExpr) -> Option<SymExpr> {
    let SymExpr::Primary(Primary::Call(name, args)) = expr else { return None };
    if name != "sqrt" {
        return None;
    }

    let n = args.first()?.as_num()?;
    let root = exact_root(n, 2)?;
    Some(SymExpr::num(root))
}

/// `sqrt(8) = 2*sqrt(2)`: pulls the largest square factor out of an integer radicand.
pub fn sqrt_partial(expr: &SymExpr) -> Option<SymExpr> {
    let SymExpr::Primary(Primary::Call(name, args)) = expr else { return None };
    if name != "sqrt" {
        return None;
    }

    let n = args.first()?.as_num()?;
    if !n.is_integer() || *n < 0u32 {
        return None;
    }

    let (outside, inside) = square_part(n.numer());
    if outside == 1u32 {
        return None;
    }
    if inside == 1u32 {
        return Some(SymExpr::num(rat(outside)));
    }
    Some(SymExpr::mul_flat(vec![
        SymExpr::num(rat(outside)),
        SymExpr::Primary(Primary::Call(
            "sqrt".to_string(),
            vec![SymExpr::num(rat(inside))],
        )),
    ]))
}

/// Splits `n` into `(outside, inside)` with `n = outside^2 * inside`, where `inside` has no
/// square factor findable by trial division.
fn square_part(n: &Integer) -> (Integer, Integer) {
    let mut outside = int(1);
    let mut rem = n.clone();

    let mut i = int(2);
    while i <= SQUARE_TRIAL_BOUND && Integer::from(&i * &i) <= rem {
        let square = Integer::from(&i * &i);
        while rem.is_divisible(&square) {
            rem /= &square;
            outside *= &i;
        }
        i += 1;
    }

    // what remains may be a square of primes above the trial bound
    if rem.is_perfect_square() {
        outside *= rem.clone().sqrt();
        rem = int(1);
    }

    (outside, rem)
}

/// `sin`, `cos` and `tan` at an exact multiple of `pi/2`.
pub fn trig_exact(expr: &SymExpr) -> Option<SymExpr> {
    let SymExpr::Primary(Primary::Call(name, args)) = expr else { return None };
    if !matches!(name.as_str(), "sin" | "cos" | "tan") {
        return None;
    }

    let multiple = pi_multiple(args.first()?)?;
    // reduce into [0, 2) turns of pi
    let two = rat(2);
    let floored = Rational::from(&multiple / &two).floor();
    let t = multiple - Rational::from(&floored * &two);

    let value = if t == 0u32 {
        match name.as_str() {
            "sin" | "tan" => 0,
            _ => 1,
        }
    } else if t == rat((1, 2)) {
        match name.as_str() {
            "sin" => 1,
            "cos" => 0,
            // tan is undefined here; leave the call alone
            _ => return None,
        }
    } else if t == 1u32 {
        match name.as_str() {
            "sin" | "tan" => 0,
            _ => -1,
        }
    } else if t == rat((3, 2)) {
        match name.as_str() {
            "sin" => -1,
            "cos" => 0,
            _ => return None,
        }
    } else {
        return None;
    };

    Some(SymExpr::int(value))
}

/// Reads the argument as an exact rational multiple of pi. Zero counts (`0 = 0*pi`), which also
/// gives `sin(0)` and friends their exact values.
fn pi_multiple(arg: &SymExpr) -> Option<Rational> {
    match arg {
        SymExpr::Primary(Primary::Num(n)) if *n == 0u32 => Some(rat(0)),
        SymExpr::Primary(Primary::Symbol(name)) if name == consts::PI => Some(rat(1)),
        SymExpr::Mul(factors) => match factors.as_slice() {
            [a, b] => {
                let coeff = a.as_num()?;
                let SymExpr::Primary(Primary::Symbol(name)) = b else { return None };
                (name == consts::PI).then(|| coeff.clone())
            },
            _ => None,
        },
        _ => None,
    }
}
