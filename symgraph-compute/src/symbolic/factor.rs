//! Factoring of polynomial expressions over the rationals.
//!
//! Factoring proceeds in three steps: expand to polynomial normal form, pull out the numeric
//! content and any monomial common to every term, and then factor the univariate remainder by
//! rational-root extraction. Irreducible remainders (including anything multivariate) are left
//! intact, so `factor` never loses information; at worst it returns the expanded input.

use crate::consts;
use crate::fmt::canonical;
use crate::primitive::rat;
use rug::{ops::Pow, Integer, Rational};
use super::expand::expand;
use super::expr::SymExpr;
use super::poly::Poly;
use super::simplify::simplify;

/// Factors the expression.
pub fn factor(expr: &SymExpr) -> SymExpr {
    let expanded = expand(expr);
    if !matches!(expanded, SymExpr::Add(_)) {
        // a single term is already a product
        return expanded;
    }

    let (content, monomial, remainder) = extract_common(&expanded);
    let factored = factor_univariate(&remainder).unwrap_or(remainder);

    let mut factors = Vec::new();
    if content != 1u32 {
        factors.push(SymExpr::num(content));
    }
    factors.extend(monomial);
    factors.push(factored);

    // merging numeric factors and equal bases; simplify never re-distributes
    simplify(&SymExpr::mul_flat(factors))
}

/// One term of a sum, decomposed into a rational coefficient and `(base, integer exponent)`
/// factors. Factors that are not integer powers keep exponent one with themselves as base.
struct TermParts {
    coeff: Rational,
    factors: Vec<(SymExpr, i64)>,
}

fn decompose(term: &SymExpr) -> TermParts {
    let factors: Vec<&SymExpr> = match term {
        SymExpr::Mul(factors) => factors.iter().collect(),
        term => vec![term],
    };

    let mut coeff = rat(1);
    let mut parts: Vec<(SymExpr, i64)> = Vec::new();
    for factor in factors {
        if let Some(n) = factor.as_num() {
            coeff *= n;
            continue;
        }

        let integer_exp = |exp: &SymExpr| {
            exp.as_num()
                .filter(|e| e.is_integer())
                .and_then(|e| e.numer().to_i64())
        };
        let (base, exp) = match factor {
            SymExpr::Exp(base, exp) => match integer_exp(exp) {
                Some(k) => ((**base).clone(), k),
                None => (factor.clone(), 1),
            },
            factor => (factor.clone(), 1),
        };
        match parts.iter_mut().find(|(existing, _)| *existing == base) {
            Some((_, existing_exp)) => *existing_exp += exp,
            None => parts.push((base, exp)),
        }
    }

    TermParts { coeff, factors: parts }
}

/// The greatest common divisor of two non-negative rationals:
/// `gcd(a/b, c/d) = gcd(a, c) / lcm(b, d)`.
fn rat_gcd(a: &Rational, b: &Rational) -> Rational {
    let numer = Integer::from(a.numer().gcd_ref(b.numer()));
    let denom = Integer::from(a.denom().lcm_ref(b.denom()));
    Rational::from((numer, denom))
}

/// Pulls the numeric content and the common monomial out of a sum, returning
/// `(content, monomial factors, remainder)` with `expr = content * monomial * remainder`.
fn extract_common(expr: &SymExpr) -> (Rational, Vec<SymExpr>, SymExpr) {
    let SymExpr::Add(terms) = expr else {
        return (rat(1), Vec::new(), expr.clone());
    };
    let parts: Vec<TermParts> = terms.iter().map(decompose).collect();

    let mut content = parts[0].coeff.clone().abs();
    for part in &parts[1..] {
        content = rat_gcd(&content, &part.coeff.clone().abs());
    }
    if content == 0u32 {
        return (rat(1), Vec::new(), expr.clone());
    }

    // give the content the sign of the highest-degree term so the leading coefficient of the
    // remainder comes out positive
    let leading = terms
        .iter()
        .enumerate()
        .max_by(|(i, a), (j, b)| a.degree().cmp(&b.degree()).then(j.cmp(i)))
        .map(|(i, _)| i)
        .unwrap_or(0);
    if parts[leading].coeff < 0u32 {
        content = -content;
    }

    // a base divides out only if it appears with a positive integer exponent in every term
    let mut common: Vec<(SymExpr, i64)> = Vec::new();
    for (base, exp) in &parts[0].factors {
        let mut min_exp = *exp;
        for part in &parts[1..] {
            let found = part
                .factors
                .iter()
                .find(|(other, _)| other == base)
                .map(|(_, e)| *e)
                .unwrap_or(0);
            min_exp = min_exp.min(found);
        }
        if min_exp > 0 {
            common.push((base.clone(), min_exp));
        }
    }

    let remainder_terms: Vec<SymExpr> = parts
        .iter()
        .map(|part| {
            let mut factors = vec![SymExpr::num(Rational::from(&part.coeff / &content))];
            for (base, exp) in &part.factors {
                let shared = common
                    .iter()
                    .find(|(other, _)| other == base)
                    .map(|(_, e)| *e)
                    .unwrap_or(0);
                let remaining = exp - shared;
                if remaining == 1 {
                    factors.push(base.clone());
                } else if remaining != 0 {
                    factors.push(SymExpr::pow(base.clone(), SymExpr::int(remaining)));
                }
            }
            SymExpr::mul_flat(factors)
        })
        .collect();

    let monomial = common
        .into_iter()
        .map(|(base, exp)| {
            if exp == 1 {
                base
            } else {
                SymExpr::pow(base, SymExpr::int(exp))
            }
        })
        .collect();

    (content, monomial, simplify(&SymExpr::add_flat(remainder_terms)))
}

/// Factors a univariate polynomial of degree two or more by rational-root extraction. Returns
/// `None` when the expression is not such a polynomial or nothing factors out.
fn factor_univariate(expr: &SymExpr) -> Option<SymExpr> {
    let symbols: Vec<String> = expr
        .free_symbols()
        .into_iter()
        .filter(|name| !consts::is_constant(name))
        .collect();
    let [var] = symbols.as_slice() else { return None };

    let poly = Poly::from_expr(expr, var)?;
    if poly.degree() < 2 {
        return None;
    }

    let (roots, residual) = poly.rational_roots();
    if roots.is_empty() {
        return None;
    }

    let mut scale = rat(1);
    let mut factors: Vec<SymExpr> = Vec::new();
    for (root, mult) in roots {
        // x - p/q becomes the integer-coefficient factor (q*x - p), costing a factor q each time
        let p = root.numer().clone();
        let q = root.denom().clone();
        let linear = SymExpr::add_flat(vec![
            SymExpr::mul_flat(vec![SymExpr::num(rat(q.clone())), SymExpr::symbol(var.clone())]),
            SymExpr::num(rat(-p)),
        ]);
        scale /= Rational::from(Integer::from((&q).pow(mult)));
        factors.push(if mult == 1 {
            linear
        } else {
            SymExpr::pow(linear, SymExpr::num(rat(mult)))
        });
    }

    if residual.degree() == 0 {
        if !residual.is_zero() {
            scale *= residual.coeff(0);
        }
    } else {
        let (ints, residual_scale) = residual.integer_primitive();
        scale *= residual_scale;
        factors.push(poly_to_expr(&ints, var));
    }

    factors.sort_by_key(|factor| (factor.degree(), canonical(factor)));
    if scale != 1u32 {
        factors.insert(0, SymExpr::num(scale));
    }
    Some(SymExpr::mul_flat(factors))
}

/// Rebuilds an integer-coefficient polynomial as an expression.
fn poly_to_expr(coeffs: &[Integer], var: &str) -> SymExpr {
    let mut terms = Vec::new();
    for (power, coeff) in coeffs.iter().enumerate() {
        if *coeff == 0u32 {
            continue;
        }

        let mut factors = Vec::new();
        if *coeff != 1u32 || power == 0 {
            factors.push(SymExpr::num(rat(coeff.clone())));
        }
        if power == 1 {
            factors.push(SymExpr::symbol(var));
        } else if power > 1 {
            factors.push(SymExpr::pow(SymExpr::symbol(var), SymExpr::int(power as i64)));
        }
        terms.push(SymExpr::mul_flat(factors));
    }
    SymExpr::add_flat(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use symgraph_parser::parser::Parser;

    fn factored(input: &str) -> String {
        let ast = Parser::new(input).try_parse_full().unwrap();
        canonical(&factor(&SymExpr::from_ast(&ast).unwrap()))
    }

    #[test]
    fn perfect_square() {
        assert_eq!(factored("x**2 + 2*x + 1"), "(x + 1)**2");
    }

    #[test]
    fn content_and_monomial() {
        assert_eq!(factored("2*x**2 + 4*x + 2"), "2*(x + 1)**2");
        assert_eq!(factored("3*x**2 + 6*x"), "3*x*(x + 2)");
    }

    #[test]
    fn distinct_roots() {
        assert_eq!(factored("x**2 - 4"), "(x + 2)*(x - 2)");
        assert_eq!(factored("2*x**2 + 5*x - 3"), "(2*x - 1)*(x + 3)");
    }

    #[test]
    fn irreducible_stays_expanded() {
        assert_eq!(factored("x**2 + 1"), "x**2 + 1");
        assert_eq!(factored("x**2 + x + 1"), "x**2 + x + 1");
    }

    #[test]
    fn factoring_undoes_expansion() {
        assert_eq!(factored("(x + 1)*(x + 2)"), "(x + 1)*(x + 2)");
    }
}
