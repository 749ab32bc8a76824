//! Dense univariate polynomials over the rationals.
//!
//! [`Poly`] is the workhorse behind factoring and equation solving: an expanded expression that
//! is a polynomial in one variable converts losslessly into a coefficient vector, where root
//! extraction and deflation are mechanical.

use crate::primitive::{int, rat};
use rug::{Integer, Rational};
use super::expr::{Primary, SymExpr};

/// Constant terms above this bound are not searched for rational roots; enumerating their
/// divisors would be unreasonable.
const DIVISOR_BOUND: u64 = 1_000_000_000_000;

/// At most this many root candidates are tested.
const CANDIDATE_BOUND: usize = 1024;

/// A dense univariate polynomial; `coeffs[k]` is the coefficient of `x^k`. The zero polynomial
/// has no coefficients, and a non-zero polynomial never has a trailing zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Poly {
    coeffs: Vec<Rational>,
}

impl Poly {
    /// Creates a polynomial from ascending coefficients, trimming trailing zeros.
    pub fn new(coeffs: Vec<Rational>) -> Poly {
        let mut poly = Poly { coeffs };
        poly.trim();
        poly
    }

    fn trim(&mut self) {
        while self.coeffs.last().map(|c| *c == 0u32).unwrap_or(false) {
            self.coeffs.pop();
        }
    }

    /// True for the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// The degree; zero for constants and for the zero polynomial.
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// The coefficient of `x^k`.
    pub fn coeff(&self, k: usize) -> Rational {
        self.coeffs.get(k).cloned().unwrap_or_else(|| rat(0))
    }

    /// Reads an **expanded** expression as a polynomial in `var`. Returns `None` if any term is
    /// not a rational multiple of a power of `var`.
    pub fn from_expr(expr: &SymExpr, var: &str) -> Option<Poly> {
        let terms: Vec<&SymExpr> = match expr {
            SymExpr::Add(terms) => terms.iter().collect(),
            expr => vec![expr],
        };

        let mut coeffs: Vec<Rational> = Vec::new();
        for term in terms {
            let (coeff, power) = monomial(term, var)?;
            if coeffs.len() <= power {
                coeffs.resize(power + 1, rat(0));
            }
            coeffs[power] += coeff;
        }
        Some(Poly::new(coeffs))
    }

    /// Evaluates the polynomial at `x` by Horner's scheme.
    pub fn eval(&self, x: &Rational) -> Rational {
        let mut acc = rat(0);
        for coeff in self.coeffs.iter().rev() {
            acc *= x;
            acc += coeff;
        }
        acc
    }

    /// Synthetic division by `(x - root)`. The caller guarantees `root` is a root.
    pub fn deflate(&self, root: &Rational) -> Poly {
        let n = self.coeffs.len();
        if n <= 1 {
            return Poly::new(Vec::new());
        }

        let mut out = vec![rat(0); n - 1];
        out[n - 2] = self.coeffs[n - 1].clone();
        for k in (1..n - 1).rev() {
            let carry = Rational::from(&out[k] * root);
            out[k - 1] = Rational::from(&self.coeffs[k] + &carry);
        }
        Poly::new(out)
    }

    /// Extracts every rational root with its multiplicity, returning the roots and the deflated
    /// residual polynomial. Roots at zero come first, then candidates from the rational root
    /// theorem in ascending magnitude.
    pub fn rational_roots(&self) -> (Vec<(Rational, u32)>, Poly) {
        let mut poly = self.clone();
        let mut roots: Vec<(Rational, u32)> = Vec::new();
        if poly.is_zero() || poly.degree() == 0 {
            return (roots, poly);
        }

        let mut zero_mult = 0u32;
        while poly.degree() >= 1 && poly.coeffs[0] == 0u32 {
            poly.coeffs.remove(0);
            zero_mult += 1;
        }
        if zero_mult > 0 {
            roots.push((rat(0), zero_mult));
        }
        if poly.degree() == 0 {
            return (roots, poly);
        }

        let Some(candidates) = poly.root_candidates() else {
            return (roots, poly);
        };
        for magnitude in candidates {
            for candidate in [magnitude.clone(), -magnitude] {
                let mut mult = 0u32;
                while poly.degree() >= 1 && poly.eval(&candidate) == 0u32 {
                    poly = poly.deflate(&candidate);
                    mult += 1;
                }
                if mult > 0 {
                    roots.push((candidate, mult));
                }
            }
        }

        (roots, poly)
    }

    /// Candidate root magnitudes `p/q` from the rational root theorem, or `None` when the
    /// bounding coefficients are too large to enumerate.
    fn root_candidates(&self) -> Option<Vec<Rational>> {
        let (ints, _) = self.integer_primitive();
        let a0 = ints.first()?.clone().abs().to_u64()?;
        let an = ints.last()?.clone().abs().to_u64()?;
        if a0 == 0 || a0 > DIVISOR_BOUND || an > DIVISOR_BOUND {
            return None;
        }

        let ps = divisors(a0);
        let qs = divisors(an);
        if ps.len() * qs.len() > CANDIDATE_BOUND {
            return None;
        }

        let mut candidates: Vec<Rational> = Vec::new();
        for q in &qs {
            for p in &ps {
                let candidate = Rational::from((int(*p), int(*q)));
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
        Some(candidates)
    }

    /// Clears denominators and content: returns integer coefficients with a positive leading
    /// coefficient, and the rational `scale` such that `self = scale * primitive`.
    pub fn integer_primitive(&self) -> (Vec<Integer>, Rational) {
        let mut lcm = int(1);
        for coeff in &self.coeffs {
            lcm.lcm_mut(coeff.denom());
        }

        let scaled: Vec<Integer> = self
            .coeffs
            .iter()
            .map(|coeff| Rational::from(coeff * &lcm).numer().clone())
            .collect();

        let mut gcd = int(0);
        for coeff in &scaled {
            gcd.gcd_mut(coeff);
        }
        if gcd == 0u32 {
            return (scaled, rat(0));
        }

        let negative_lead = scaled.last().map(|c| *c < 0u32).unwrap_or(false);
        let divisor = if negative_lead { -gcd } else { gcd };
        let primitive = scaled
            .into_iter()
            .map(|coeff| Integer::from(coeff / &divisor))
            .collect();
        (primitive, Rational::from((divisor, lcm)))
    }
}

/// Decomposes a term into `(c, k)` such that the term is `c * var^k`.
fn monomial(term: &SymExpr, var: &str) -> Option<(Rational, usize)> {
    let factors: Vec<&SymExpr> = match term {
        SymExpr::Mul(factors) => factors.iter().collect(),
        term => vec![term],
    };

    let mut coeff = rat(1);
    let mut power = 0usize;
    for factor in factors {
        match factor {
            SymExpr::Primary(Primary::Num(n)) => coeff *= n,
            SymExpr::Primary(Primary::Symbol(name)) if name == var => power += 1,
            SymExpr::Exp(base, exp) => {
                let SymExpr::Primary(Primary::Symbol(name)) = &**base else { return None };
                if name != var {
                    return None;
                }
                let e = exp.as_num()?;
                if !e.is_integer() {
                    return None;
                }
                let k = e.numer().to_usize()?;
                if k == 0 {
                    return None;
                }
                power += k;
            },
            _ => return None,
        }
    }
    Some((coeff, power))
}

/// The divisors of `n`, ascending.
fn divisors(n: u64) -> Vec<u64> {
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut i = 1u64;
    while i * i <= n {
        if n % i == 0 {
            small.push(i);
            if i != n / i {
                large.push(n / i);
            }
        }
        i += 1;
    }
    large.reverse();
    small.extend(large);
    small
}

#[cfg(test)]
mod tests {
    use super::*;
    use symgraph_parser::parser::Parser;
    use crate::symbolic::expand::expand;

    fn poly(input: &str) -> Poly {
        let ast = Parser::new(input).try_parse_full().unwrap();
        let expr = expand(&SymExpr::from_ast(&ast).unwrap());
        Poly::from_expr(&expr, "x").unwrap()
    }

    #[test]
    fn coefficients() {
        let p = poly("x**2 + 2*x + 1");
        assert_eq!(p.degree(), 2);
        assert_eq!(p.coeff(0), rat(1));
        assert_eq!(p.coeff(1), rat(2));
        assert_eq!(p.coeff(2), rat(1));
    }

    #[test]
    fn eval_and_deflate() {
        let p = poly("x**2 - 4");
        assert_eq!(p.eval(&rat(2)), rat(0));
        assert_eq!(p.eval(&rat(3)), rat(5));

        let q = p.deflate(&rat(2));
        // x**2 - 4 = (x - 2)(x + 2)
        assert_eq!(q, Poly::new(vec![rat(2), rat(1)]));
    }

    #[test]
    fn roots_with_multiplicity() {
        let p = poly("x**2 + 2*x + 1");
        let (roots, residual) = p.rational_roots();
        assert_eq!(roots, vec![(rat(-1), 2)]);
        assert_eq!(residual.degree(), 0);
    }

    #[test]
    fn fractional_roots() {
        // (2x - 1)(x + 3) = 2x^2 + 5x - 3
        let p = poly("2*x**2 + 5*x - 3");
        let (roots, _) = p.rational_roots();
        let mut values: Vec<Rational> = roots.into_iter().map(|(r, _)| r).collect();
        values.sort();
        assert_eq!(values, vec![rat(-3), rat((1, 2))]);
    }

    #[test]
    fn not_a_polynomial() {
        let ast = Parser::new("sin(x) + 1").try_parse_full().unwrap();
        let expr = expand(&SymExpr::from_ast(&ast).unwrap());
        assert!(Poly::from_expr(&expr, "x").is_none());
    }
}
