//! Functions to construct [`Integer`]s, [`Rational`]s and [`Float`]s from various types.

use rug::{ops::Pow, Assign, Float, Integer, Rational};

/// The number of bits of precision to use when approximating values.
pub const PRECISION: u32 = 1 << 8;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates an [`Integer`] from a string of decimal digits.
pub fn int_from_str(s: &str) -> Integer {
    // the tokenizer only produces digit runs here
    Integer::from_str_radix(s, 10).unwrap()
}

/// Creates a [`Rational`] with the given value.
pub fn rat<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Creates a [`Rational`] from a decimal literal such as `3.14`, exactly (`157/50`).
pub fn rat_from_decimal(s: &str) -> Rational {
    match s.split_once('.') {
        Some((whole, frac)) => {
            let digits = format!("{}{}", whole, frac);
            let numer = int_from_str(&digits);
            let denom = int(10u32).pow(frac.len() as u32);
            Rational::from((numer, denom))
        },
        None => Rational::from(int_from_str(s)),
    }
}

/// Creates a [`Float`] with the given value at the working precision.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_literals_are_exact() {
        assert_eq!(rat_from_decimal("3.14"), Rational::from((157, 50)));
        assert_eq!(rat_from_decimal("0.5"), Rational::from((1, 2)));
        assert_eq!(rat_from_decimal("12"), Rational::from(12));
    }
}
