//! Numeric evaluation of expressions.
//!
//! Evaluation is exact wherever it can be: sums, products and integer powers of rationals stay
//! rationals. Only irrational functions and `pi` force the result onto [`rug::Float`] at the
//! fixed working precision, which keeps results reproducible across runs and machines: there
//! is no dependence on evaluation order, environment, or randomness.

use crate::consts::{self, PI_VALUE};
use crate::error::{
    ArityMismatch, ComplexValue, DisallowedFunction, DivisionByZero, NonNumericResult, NotFinite,
};
use crate::funcs;
use crate::primitive::{float, PRECISION};
use crate::symbolic::expr::{Primary, SymExpr};
use crate::symbolic::simplify::simplify;
use rug::{ops::Pow, Float, Rational};
use std::cmp::Ordering;
use std::ops::Range;
use symgraph_error::Error;

/// The largest integer exponent evaluated exactly.
const MAX_EXACT_EXP: i32 = 4096;

/// Tolerance for equality of approximated values in constraint checks.
const APPROX_EQ_BITS: i32 = 100;

/// A computed numeric value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An exact rational.
    Exact(Rational),

    /// An approximation at the working precision.
    Approx(Float),
}

impl Value {
    /// Converts the value back into an expression for rendering.
    pub fn into_expr(self) -> SymExpr {
        match self {
            Value::Exact(n) => SymExpr::num(n),
            Value::Approx(f) => SymExpr::Primary(Primary::Float(f)),
        }
    }

    /// The value as a float at the working precision.
    pub fn as_float(&self) -> Float {
        match self {
            Value::Exact(n) => float(n),
            Value::Approx(f) => f.clone(),
        }
    }
}

/// Compares two values, exactly when both are exact.
pub fn value_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Exact(x), Value::Exact(y)) => Some(x.cmp(y)),
        _ => a.as_float().partial_cmp(&b.as_float()),
    }
}

/// Tests two values for equality, with a tolerance when approximation is involved.
pub fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Exact(x), Value::Exact(y)) => x == y,
        _ => {
            let diff = Float::with_val(PRECISION, a.as_float() - b.as_float()).abs();
            diff < Float::with_val(PRECISION, Float::i_exp(1, -APPROX_EQ_BITS))
        },
    }
}

/// Evaluates the expression to a number. The expression is simplified first, so exact
/// cancellations (`sin(pi)`, `x - x`) resolve before any approximation. Free symbols other than
/// the known constants make this fail with `NonNumericResult`.
pub fn evaluate(expr: &SymExpr, span: Range<usize>) -> Result<Value, Error> {
    let simplified = simplify(expr);

    let free: Vec<String> = simplified
        .free_symbols()
        .into_iter()
        .filter(|name| !consts::is_constant(name))
        .collect();
    if !free.is_empty() {
        return Err(Error::new(vec![span], NonNumericResult { symbols: free }));
    }

    let value = fold(&simplified, &span)?;
    if let Value::Approx(f) = &value {
        if !f.is_finite() {
            return Err(Error::new(vec![span], NotFinite));
        }
    }
    Ok(value)
}

/// Evaluates without error context, for internal sign tests and constraint checks.
pub(crate) fn quiet(expr: &SymExpr) -> Option<Value> {
    let value = fold(&simplify(expr), &(0..0)).ok()?;
    match &value {
        Value::Approx(f) if !f.is_finite() => None,
        _ => Some(value),
    }
}

/// Approximates the expression as a float, if it evaluates at all.
pub(crate) fn approx(expr: &SymExpr) -> Option<Float> {
    quiet(expr).map(|value| value.as_float())
}

fn fold(expr: &SymExpr, span: &Range<usize>) -> Result<Value, Error> {
    match expr {
        SymExpr::Primary(Primary::Num(n)) => Ok(Value::Exact(n.clone())),
        SymExpr::Primary(Primary::Float(f)) => Ok(Value::Approx(f.clone())),
        SymExpr::Primary(Primary::Symbol(name)) => {
            if consts::is_constant(name) {
                Ok(Value::Approx(PI_VALUE.clone()))
            } else {
                Err(Error::new(
                    vec![span.clone()],
                    NonNumericResult { symbols: vec![name.clone()] },
                ))
            }
        },
        SymExpr::Primary(Primary::Call(name, args)) => {
            let Some(builtin) = funcs::get(name) else {
                return Err(Error::new(
                    vec![span.clone()],
                    DisallowedFunction {
                        name: name.clone(),
                        suggestions: funcs::suggestions(name),
                    },
                ));
            };
            let Some(arg) = args.first() else {
                return Err(Error::new(
                    vec![span.clone()],
                    ArityMismatch { name: name.clone(), expected: builtin.arity, given: 0 },
                ));
            };

            let value = fold(arg, span)?;
            if name == "sqrt" {
                if let Value::Exact(n) = &value {
                    if *n < 0u32 {
                        return Err(Error::new(
                            vec![span.clone()],
                            ComplexValue { context: name.clone() },
                        ));
                    }
                }
            }

            let result = builtin.numeric(value.as_float());
            if result.is_nan() {
                return Err(Error::new(
                    vec![span.clone()],
                    ComplexValue { context: name.clone() },
                ));
            }
            Ok(Value::Approx(result))
        },
        SymExpr::Add(terms) => {
            let mut acc = Value::Exact(Rational::new());
            for term in terms {
                acc = combine(acc, fold(term, span)?, |a, b| a + b, |a, b| a + b);
            }
            Ok(acc)
        },
        SymExpr::Mul(factors) => {
            let mut acc = Value::Exact(Rational::from(1));
            for factor in factors {
                acc = combine(acc, fold(factor, span)?, |a, b| a * b, |a, b| a * b);
            }
            Ok(acc)
        },
        SymExpr::Exp(base, exp) => {
            let base = fold(base, span)?;
            let exp = fold(exp, span)?;

            if let (Value::Exact(b), Value::Exact(e)) = (&base, &exp) {
                if e.is_integer() {
                    if let Some(k) = e.numer().to_i32() {
                        if k.abs() <= MAX_EXACT_EXP {
                            if *b == 0u32 && k < 0 {
                                return Err(Error::new(vec![span.clone()], DivisionByZero));
                            }
                            return Ok(Value::Exact(Rational::from(b.pow(k))));
                        }
                    }
                }
            }

            let b = base.as_float();
            let e = exp.as_float();
            if b.is_zero() && e.is_sign_negative() {
                return Err(Error::new(vec![span.clone()], DivisionByZero));
            }
            if b.is_sign_negative() && !e.is_integer() {
                return Err(Error::new(
                    vec![span.clone()],
                    ComplexValue { context: "**".to_string() },
                ));
            }
            Ok(Value::Approx(Float::with_val(PRECISION, (&b).pow(&e))))
        },
    }
}

/// Combines two values, exactly when both are exact.
fn combine(
    a: Value,
    b: Value,
    exact: fn(Rational, Rational) -> Rational,
    approx: fn(Float, Float) -> Float,
) -> Value {
    match (a, b) {
        (Value::Exact(x), Value::Exact(y)) => Value::Exact(exact(x, y)),
        (a, b) => Value::Approx(approx(a.as_float(), b.as_float())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fmt::canonical;
    use symgraph_parser::parser::Parser;

    fn eval_str(input: &str) -> Result<String, Error> {
        let ast = Parser::new(input).try_parse_full().unwrap();
        let expr = SymExpr::from_ast(&ast).unwrap();
        let span = 0..input.len();
        evaluate(&expr, span).map(|value| canonical(&value.into_expr()))
    }

    #[test]
    fn exact_arithmetic() {
        assert_eq!(eval_str("2 + 2").unwrap(), "4");
        assert_eq!(eval_str("4 * 3").unwrap(), "12");
        assert_eq!(eval_str("1 / 3").unwrap(), "1/3");
        assert_eq!(eval_str("2 ** 10").unwrap(), "1024");
        assert_eq!(eval_str("(1 + 2) ** 2").unwrap(), "9");
    }

    #[test]
    fn exact_cancellation_before_approximation() {
        assert_eq!(eval_str("sin(pi)").unwrap(), "0");
        assert_eq!(eval_str("sqrt(4)").unwrap(), "2");
        assert_eq!(eval_str("x - x + 3").unwrap(), "3");
    }

    #[test]
    fn free_symbols_are_rejected() {
        let err = eval_str("x + 1").unwrap_err();
        assert!(err.is::<NonNumericResult>());
    }

    #[test]
    fn division_by_zero() {
        let err = eval_str("1 / 0").unwrap_err();
        assert!(err.is::<DivisionByZero>());
    }

    #[test]
    fn complex_values_are_rejected() {
        let err = eval_str("sqrt(0 - 4)").unwrap_err();
        assert!(err.is::<ComplexValue>());
    }

    #[test]
    fn determinism() {
        let a = eval_str("sin(1) + cos(1) * 2").unwrap();
        let b = eval_str("sin(1) + cos(1) * 2").unwrap();
        assert_eq!(a, b);
    }
}
