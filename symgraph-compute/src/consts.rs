//! Constants recognized by the evaluator.

use crate::primitive::PRECISION;
use once_cell::sync::Lazy;
use rug::{float::Constant, Float};

/// The symbol name that denotes the circle constant.
pub const PI: &str = "pi";

/// The circle constant at the working precision.
pub static PI_VALUE: Lazy<Float> = Lazy::new(|| Float::with_val(PRECISION, Constant::Pi));

/// Returns true if the symbol names a known constant rather than a free variable.
pub fn is_constant(name: &str) -> bool {
    name == PI
}
