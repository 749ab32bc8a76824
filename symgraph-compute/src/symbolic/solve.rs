//! Equation solving for one unknown.
//!
//! The result of solving is always a [`SolutionSet`], never an error: an unsatisfiable equation
//! is the [`SolutionSet::Empty`] set, an identity is [`SolutionSet::AllReal`], and an equation
//! the engine cannot reduce to enumerable roots is kept whole as [`SolutionSet::Implicit`], a
//! tagged family of solutions rather than a silent truncation.

use crate::domain::Domain;
use crate::eval;
use crate::fmt::canonical;
use crate::primitive::rat;
use rug::Rational;
use symgraph_parser::parser::op::BinOpKind;
use super::expand::expand;
use super::expr::{Primary, SymExpr};
use super::poly::Poly;
use super::simplify::simplify;
use super::simplify::rules::power::exact_root;

/// The set of solutions to one equation in one unknown.
#[derive(Debug, Clone, PartialEq)]
pub enum SolutionSet {
    /// Finitely many solutions, deduplicated and sorted: numeric roots ascending, then symbolic
    /// roots by their canonical text.
    Finite(Vec<SymExpr>),

    /// No solutions. An unsatisfiable equation is a result, not an error.
    Empty,

    /// Every real number satisfies the equation.
    AllReal,

    /// The solutions of `equation = 0`, kept implicit because the engine cannot enumerate them.
    Implicit {
        /// The unknown being solved for.
        var: String,

        /// The left-hand side of the residual equation.
        equation: SymExpr,
    },
}

/// An auxiliary condition attached to a solve task, such as `x > 0` or an extra equation.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// The comparison operator.
    pub op: BinOpKind,

    /// The left-hand side.
    pub lhs: SymExpr,

    /// The right-hand side.
    pub rhs: SymExpr,
}

/// Solves `expr = 0` for `var` under the given domain assumption.
pub fn solve(expr: &SymExpr, var: &str, domain: Domain) -> SolutionSet {
    let expanded = expand(expr);

    if !expanded.contains_symbol(var) {
        // the unknown vanished: an exact zero is an identity, anything else has no solutions
        return if expanded.is_zero() {
            SolutionSet::AllReal
        } else {
            SolutionSet::Empty
        };
    }

    let set = match Poly::from_expr(&expanded, var) {
        Some(poly) => solve_poly(&poly, var, &expanded),
        None => solve_symbolic_linear(&expanded, var),
    };
    finish(set, domain)
}

/// Drops the finite solutions that violate one of the relations. A candidate the relations
/// cannot decide numerically is kept.
pub fn filter_solutions(set: SolutionSet, var: &str, relations: &[Relation]) -> SolutionSet {
    let SolutionSet::Finite(roots) = set else { return set };

    let kept: Vec<SymExpr> = roots
        .into_iter()
        .filter(|root| relations.iter().all(|relation| relation_keeps(relation, var, root)))
        .collect();
    if kept.is_empty() {
        SolutionSet::Empty
    } else {
        SolutionSet::Finite(kept)
    }
}

fn relation_keeps(relation: &Relation, var: &str, root: &SymExpr) -> bool {
    let lhs = relation.lhs.substitute(var, root);
    let rhs = relation.rhs.substitute(var, root);
    let (Some(a), Some(b)) = (eval::quiet(&lhs), eval::quiet(&rhs)) else {
        return true;
    };

    match relation.op {
        BinOpKind::Eq => eval::value_eq(&a, &b),
        BinOpKind::NotEq => !eval::value_eq(&a, &b),
        BinOpKind::Greater => eval::value_cmp(&a, &b).map_or(true, |o| o.is_gt()),
        BinOpKind::GreaterEq => eval::value_cmp(&a, &b).map_or(true, |o| o.is_ge()),
        BinOpKind::Less => eval::value_cmp(&a, &b).map_or(true, |o| o.is_lt()),
        BinOpKind::LessEq => eval::value_cmp(&a, &b).map_or(true, |o| o.is_le()),
        _ => true,
    }
}

fn solve_poly(poly: &Poly, var: &str, expanded: &SymExpr) -> SolutionSet {
    match poly.degree() {
        0 => SolutionSet::Empty,
        1 => {
            let root = Rational::from(-poly.coeff(0)) / poly.coeff(1);
            SolutionSet::Finite(vec![SymExpr::num(root)])
        },
        2 => quadratic(&poly.coeff(0), &poly.coeff(1), &poly.coeff(2)),
        _ => {
            let (roots, residual) = poly.rational_roots();
            let mut found: Vec<SymExpr> = roots
                .into_iter()
                .map(|(root, _)| SymExpr::num(root))
                .collect();

            match residual.degree() {
                0 => SolutionSet::Finite(found),
                2 => {
                    match quadratic(&residual.coeff(0), &residual.coeff(1), &residual.coeff(2)) {
                        SolutionSet::Finite(mut more) => {
                            found.append(&mut more);
                            SolutionSet::Finite(found)
                        },
                        SolutionSet::Empty => SolutionSet::Finite(found),
                        set => set,
                    }
                },
                // an irreducible residual of higher degree: returning only the rational roots
                // would silently drop solutions, so the whole equation stays implicit
                _ => SolutionSet::Implicit {
                    var: var.to_string(),
                    equation: expanded.clone(),
                },
            }
        },
    }
}

/// Solves `c2*x^2 + c1*x + c0 = 0` over the reals.
fn quadratic(c0: &Rational, c1: &Rational, c2: &Rational) -> SolutionSet {
    let disc = Rational::from(c1 * c1) - Rational::from(c2 * c0) * rat(4);
    if disc < 0u32 {
        return SolutionSet::Empty;
    }

    let neg_b = -c1.clone();
    let half = rat(1) / Rational::from(c2 * &rat(2));
    match exact_root(&disc, 2) {
        Some(s) => {
            if s == 0u32 {
                let root = neg_b * &half;
                return SolutionSet::Finite(vec![SymExpr::num(root)]);
            }
            let minus = Rational::from(&neg_b - &s) * &half;
            let plus = Rational::from(&neg_b + &s) * &half;
            SolutionSet::Finite(vec![SymExpr::num(minus), SymExpr::num(plus)])
        },
        None => {
            let sqrt_disc = SymExpr::Primary(Primary::Call(
                "sqrt".to_string(),
                vec![SymExpr::num(disc)],
            ));
            let minus = simplify(&SymExpr::mul_flat(vec![
                SymExpr::add_flat(vec![SymExpr::num(neg_b.clone()), sqrt_disc.clone().neg()]),
                SymExpr::num(half.clone()),
            ]));
            let plus = simplify(&SymExpr::mul_flat(vec![
                SymExpr::add_flat(vec![SymExpr::num(neg_b), sqrt_disc]),
                SymExpr::num(half),
            ]));
            SolutionSet::Finite(vec![minus, plus])
        },
    }
}

/// Attempts to read the expression as `a*var + b` with `a` and `b` free of `var`, solving to
/// `-b/a`. This covers equations with symbolic coefficients, such as `a*x + 4 = 0` solved for
/// `x`.
fn solve_symbolic_linear(expr: &SymExpr, var: &str) -> SolutionSet {
    let implicit = || SolutionSet::Implicit {
        var: var.to_string(),
        equation: expr.clone(),
    };

    let terms: Vec<&SymExpr> = match expr {
        SymExpr::Add(terms) => terms.iter().collect(),
        expr => vec![expr],
    };

    let mut a_parts: Vec<SymExpr> = Vec::new();
    let mut b_parts: Vec<SymExpr> = Vec::new();
    for term in terms {
        if term.contains_symbol(var) {
            match strip_linear_var(term, var) {
                Some(cofactor) => a_parts.push(cofactor),
                None => return implicit(),
            }
        } else {
            b_parts.push((*term).clone());
        }
    }

    let a = simplify(&SymExpr::add_flat(a_parts));
    if a.is_zero() {
        return implicit();
    }
    let b = SymExpr::add_flat(b_parts);
    let root = simplify(&SymExpr::mul_flat(vec![b.neg(), a.recip()]));
    SolutionSet::Finite(vec![root])
}

/// Removes exactly one factor equal to the symbol from the term, requiring every remaining
/// factor to be free of it.
fn strip_linear_var(term: &SymExpr, var: &str) -> Option<SymExpr> {
    let factors: Vec<&SymExpr> = match term {
        SymExpr::Mul(factors) => factors.iter().collect(),
        term => vec![term],
    };

    let position = factors
        .iter()
        .position(|factor| matches!(factor, SymExpr::Primary(Primary::Symbol(name)) if name == var))?;
    let rest: Vec<SymExpr> = factors
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != position)
        .map(|(_, factor)| (*factor).clone())
        .collect();
    if rest.iter().any(|factor| factor.contains_symbol(var)) {
        return None;
    }
    Some(SymExpr::mul_flat(rest))
}

/// Deduplicates, applies the domain assumption, and sorts.
fn finish(set: SolutionSet, domain: Domain) -> SolutionSet {
    let SolutionSet::Finite(roots) = set else { return set };

    let mut unique: Vec<SymExpr> = Vec::new();
    for root in roots {
        if !unique.contains(&root) {
            unique.push(root);
        }
    }

    let mut kept: Vec<SymExpr> = unique
        .into_iter()
        .filter(|root| root_in_domain(root, domain))
        .collect();
    kept.sort_by(compare_roots);

    if kept.is_empty() {
        SolutionSet::Empty
    } else {
        SolutionSet::Finite(kept)
    }
}

fn root_in_domain(root: &SymExpr, domain: Domain) -> bool {
    match domain {
        Domain::Real => true,
        Domain::Positive => numeric_sign(root).map_or(true, |sign| sign > 0),
        Domain::Negative => numeric_sign(root).map_or(true, |sign| sign < 0),
        Domain::Nonzero => !root.is_zero(),
        Domain::Integer => root.as_num().map_or(false, |n| n.is_integer()),
    }
}

/// The sign of a root, decided exactly for rationals and by approximation otherwise.
fn numeric_sign(root: &SymExpr) -> Option<i32> {
    if let Some(n) = root.as_num() {
        return Some(n.cmp0() as i32);
    }
    eval::approx(root).map(|f| f.cmp0().map_or(0, |o| o as i32))
}

fn compare_roots(a: &SymExpr, b: &SymExpr) -> std::cmp::Ordering {
    match (a.as_num(), b.as_num()) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => canonical(a).cmp(&canonical(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symgraph_parser::parser::Parser;

    fn solved(input: &str, var: &str, domain: Domain) -> SolutionSet {
        let ast = Parser::new(input).try_parse_full().unwrap();
        solve(&SymExpr::from_ast(&ast).unwrap(), var, domain)
    }

    fn canonical_set(input: &str, var: &str, domain: Domain) -> String {
        solved(input, var, domain).canonical()
    }

    #[test]
    fn quadratic_with_rational_roots() {
        assert_eq!(canonical_set("x**2 - 4", "x", Domain::Real), "{-2, 2}");
        assert_eq!(canonical_set("x**2 + 2*x + 1", "x", Domain::Real), "{-1}");
    }

    #[test]
    fn linear() {
        assert_eq!(canonical_set("2*x - 3", "x", Domain::Real), "{3/2}");
    }

    #[test]
    fn irrational_roots_stay_symbolic() {
        assert_eq!(
            canonical_set("x**2 - 2", "x", Domain::Real),
            "{-sqrt(2), sqrt(2)}"
        );
    }

    #[test]
    fn no_real_solutions() {
        assert_eq!(solved("x**2 + 1", "x", Domain::Real), SolutionSet::Empty);
    }

    #[test]
    fn identities_and_contradictions() {
        assert_eq!(solved("x - x", "x", Domain::Real), SolutionSet::AllReal);
        assert_eq!(solved("2", "x", Domain::Real), SolutionSet::Empty);
    }

    #[test]
    fn domain_assumptions_filter_roots() {
        assert_eq!(canonical_set("x**2 - 4", "x", Domain::Positive), "{2}");
        assert_eq!(canonical_set("x**2 - 4", "x", Domain::Negative), "{-2}");
        assert_eq!(
            solved("x**2 - 2", "x", Domain::Integer),
            SolutionSet::Empty
        );
    }

    #[test]
    fn symbolic_coefficients() {
        assert_eq!(canonical_set("a*x + 4", "x", Domain::Real), "{-4/a}");
    }

    #[test]
    fn cubic_with_rational_roots() {
        // (x - 1)(x + 2)(x - 3) = x^3 - 2x^2 - 5x + 6
        assert_eq!(
            canonical_set("x**3 - 2*x**2 - 5*x + 6", "x", Domain::Real),
            "{-2, 1, 3}"
        );
    }

    #[test]
    fn unsolvable_equations_stay_implicit() {
        let set = solved("sin(x) - 1/2", "x", Domain::Real);
        assert!(matches!(set, SolutionSet::Implicit { .. }));
    }

    #[test]
    fn constraints_filter_candidates() {
        let set = solved("x**2 - 4", "x", Domain::Real);
        let constraint = Relation {
            op: BinOpKind::Greater,
            lhs: SymExpr::symbol("x"),
            rhs: SymExpr::int(0),
        };
        let filtered = filter_solutions(set, "x", &[constraint]);
        assert_eq!(filtered.canonical(), "{2}");
    }
}
