//! Rendering of expressions and solution sets.
//!
//! Two renderings exist side by side, and both are deterministic:
//!
//! - The **canonical** form is machine-re-parsable text in the evaluator's own grammar
//!   (explicit `*`, `**` for powers, `/` for division), with terms ordered by descending degree
//!   and then graded-lexicographic monomial order (`x**2 + 2*x + 1`, `x**2 + 2*x*y + y**2`).
//!   Feeding a canonical form back through the normalizer and parser reproduces the same
//!   expression, which is what lets one task's result substitute into another task's expression.
//! - The **typeset** form is LaTeX, via the [`Latex`] trait re-exported from the parser crate.

use crate::funcs;
use crate::primitive::rat;
use crate::symbolic::expr::{Primary, SymExpr};
use crate::symbolic::solve::SolutionSet;
use rug::{Float, Rational};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::{Formatter, Result as FmtResult};

pub use symgraph_parser::parser::fmt::Latex;

/// Renders the expression in canonical, re-parsable form.
pub fn canonical(expr: &SymExpr) -> String {
    canon(expr)
}

fn canon(expr: &SymExpr) -> String {
    match expr {
        SymExpr::Primary(Primary::Num(n)) => num_str(n),
        SymExpr::Primary(Primary::Float(f)) => float_str(f),
        SymExpr::Primary(Primary::Symbol(name)) => name.clone(),
        SymExpr::Primary(Primary::Call(name, args)) => {
            let args = args.iter().map(canon).collect::<Vec<_>>().join(", ");
            format!("{}({})", name, args)
        },
        SymExpr::Add(terms) => {
            let mut out = String::new();
            for (i, term) in sort_terms(terms).into_iter().enumerate() {
                let rendered = canon(term);
                if i == 0 {
                    out.push_str(&rendered);
                } else if let Some(rest) = rendered.strip_prefix('-') {
                    out.push_str(" - ");
                    out.push_str(rest);
                } else {
                    out.push_str(" + ");
                    out.push_str(&rendered);
                }
            }
            out
        },
        SymExpr::Mul(factors) => mul_str(factors),
        SymExpr::Exp(base, exp) => pow_str(base, exp),
    }
}

/// Sorts the terms of a sum: descending total degree, then graded-lexicographic monomial order
/// (so `x**2` precedes `x*y` precedes `y**2`), then the rendered text.
fn sort_terms(terms: &[SymExpr]) -> Vec<&SymExpr> {
    let mut keyed: Vec<(i64, BTreeMap<String, i64>, String, &SymExpr)> = terms
        .iter()
        .map(|term| (term.degree(), monomial_exponents(term), canon(term), term))
        .collect();
    keyed.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| compare_monomials(&a.1, &b.1))
            .then_with(|| a.2.cmp(&b.2))
    });
    keyed.into_iter().map(|(_, _, _, term)| term).collect()
}

/// The exponent of each symbol in a term, for monomial ordering.
fn monomial_exponents(term: &SymExpr) -> BTreeMap<String, i64> {
    let mut exponents = BTreeMap::new();
    let factors: Vec<&SymExpr> = match term {
        SymExpr::Mul(factors) => factors.iter().collect(),
        term => vec![term],
    };

    for factor in factors {
        match factor {
            SymExpr::Primary(Primary::Symbol(name)) => {
                *exponents.entry(name.clone()).or_insert(0) += 1;
            },
            SymExpr::Exp(base, exp) => {
                if let (SymExpr::Primary(Primary::Symbol(name)), Some(e)) =
                    (&**base, exp.as_num())
                {
                    if e.is_integer() {
                        if let Some(k) = e.numer().to_i64() {
                            *exponents.entry(name.clone()).or_insert(0) += k;
                        }
                    }
                }
            },
            _ => {},
        }
    }
    exponents
}

/// Compares two monomials: the one with the higher exponent of the alphabetically first
/// differing symbol comes first.
fn compare_monomials(a: &BTreeMap<String, i64>, b: &BTreeMap<String, i64>) -> Ordering {
    let mut symbols: Vec<&String> = a.keys().chain(b.keys()).collect();
    symbols.sort();
    symbols.dedup();

    for symbol in symbols {
        let ea = a.get(symbol).copied().unwrap_or(0);
        let eb = b.get(symbol).copied().unwrap_or(0);
        match eb.cmp(&ea) {
            Ordering::Equal => continue,
            // higher exponent of the earlier symbol sorts first
            other => return other.reverse(),
        }
    }
    Ordering::Equal
}

fn num_str(n: &Rational) -> String {
    if n.is_integer() {
        n.numer().to_string()
    } else {
        format!("{}/{}", n.numer(), n.denom())
    }
}

fn float_str(f: &Float) -> String {
    let value = f.to_f64();
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

/// Wraps sums and nested products in parentheses when they appear as factors.
fn factor_str(factor: &SymExpr) -> String {
    match factor {
        SymExpr::Add(_) | SymExpr::Mul(_) => format!("({})", canon(factor)),
        factor => canon(factor),
    }
}

fn mul_str(factors: &[SymExpr]) -> String {
    let mut coeff = rat(1);
    let mut numerator: Vec<&SymExpr> = Vec::new();
    let mut denominator: Vec<(&SymExpr, Rational)> = Vec::new();

    for factor in factors {
        if let Some(n) = factor.as_num() {
            coeff *= n;
            continue;
        }
        if let SymExpr::Exp(base, exp) = factor {
            if let Some(e) = exp.as_num() {
                if *e < 0u32 {
                    denominator.push((base, -e.clone()));
                    continue;
                }
            }
        }
        numerator.push(factor);
    }

    numerator.sort_by_key(|factor| (factor.degree(), canon(factor)));

    let negative = coeff < 0u32;
    let coeff = coeff.abs();
    let (numer_coeff, denom_coeff) = (coeff.numer(), coeff.denom());

    let mut parts: Vec<String> = Vec::new();
    if *numer_coeff != 1u32 || numerator.is_empty() {
        parts.push(numer_coeff.to_string());
    }
    parts.extend(numerator.iter().map(|factor| factor_str(factor)));
    let mut out = parts.join("*");

    let mut denom_parts: Vec<String> = Vec::new();
    if *denom_coeff != 1u32 {
        denom_parts.push(denom_coeff.to_string());
    }
    for (base, exp) in denominator {
        if exp == 1u32 {
            denom_parts.push(canon(base));
        } else {
            denom_parts.push(pow_str(base, &SymExpr::num(exp)));
        }
    }
    if !denom_parts.is_empty() {
        let joined = denom_parts.join("*");
        let simple = denom_parts.len() == 1
            && joined.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if simple {
            out = format!("{}/{}", out, joined);
        } else {
            out = format!("{}/({})", out, joined);
        }
    }

    if negative {
        format!("-{}", out)
    } else {
        out
    }
}

fn pow_str(base: &SymExpr, exp: &SymExpr) -> String {
    let base_str = if needs_parens_in_pow(base) {
        format!("({})", canon(base))
    } else {
        canon(base)
    };
    let exp_str = if needs_parens_in_pow(exp) {
        format!("({})", canon(exp))
    } else {
        canon(exp)
    };
    format!("{}**{}", base_str, exp_str)
}

fn needs_parens_in_pow(expr: &SymExpr) -> bool {
    match expr {
        SymExpr::Add(_) | SymExpr::Mul(_) | SymExpr::Exp(..) => true,
        SymExpr::Primary(Primary::Num(n)) => *n < 0u32 || !n.is_integer(),
        SymExpr::Primary(Primary::Float(f)) => f.is_sign_negative(),
        _ => false,
    }
}

impl Latex for SymExpr {
    fn fmt_latex(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", latex(self))
    }
}

fn latex(expr: &SymExpr) -> String {
    match expr {
        SymExpr::Primary(Primary::Num(n)) => {
            if n.is_integer() {
                n.numer().to_string()
            } else if *n < 0u32 {
                let abs = n.clone().abs();
                format!("-\\frac{{{}}}{{{}}}", abs.numer(), abs.denom())
            } else {
                format!("\\frac{{{}}}{{{}}}", n.numer(), n.denom())
            }
        },
        SymExpr::Primary(Primary::Float(f)) => float_str(f),
        SymExpr::Primary(Primary::Symbol(name)) => symbol_latex(name),
        SymExpr::Primary(Primary::Call(name, args)) => {
            let arg = args.first().map(latex).unwrap_or_default();
            if name == "sqrt" {
                format!("\\sqrt{{{}}}", arg)
            } else {
                let command = funcs::get(name)
                    .map(|builtin| builtin.latex.to_string())
                    .unwrap_or_else(|| format!("\\mathrm{{{}}}", name));
                format!("{}\\left({}\\right)", command, arg)
            }
        },
        SymExpr::Add(terms) => {
            let mut out = String::new();
            for (i, term) in sort_terms(terms).into_iter().enumerate() {
                let rendered = latex(term);
                if i == 0 {
                    out.push_str(&rendered);
                } else if let Some(rest) = rendered.strip_prefix('-') {
                    out.push_str(" - ");
                    out.push_str(rest);
                } else {
                    out.push_str(" + ");
                    out.push_str(&rendered);
                }
            }
            out
        },
        SymExpr::Mul(factors) => mul_latex(factors),
        SymExpr::Exp(base, exp) => {
            let base_str = if needs_parens_in_pow(base) {
                format!("\\left({}\\right)", latex(base))
            } else {
                latex(base)
            };
            format!("{}^{{{}}}", base_str, latex(exp))
        },
    }
}

fn symbol_latex(name: &str) -> String {
    if name == "pi" {
        "\\pi".to_string()
    } else if name.chars().count() == 1 {
        name.to_string()
    } else {
        format!("\\mathrm{{{}}}", name)
    }
}

fn mul_latex(factors: &[SymExpr]) -> String {
    let mut coeff = rat(1);
    let mut numerator: Vec<&SymExpr> = Vec::new();
    let mut denominator: Vec<(&SymExpr, Rational)> = Vec::new();

    for factor in factors {
        if let Some(n) = factor.as_num() {
            coeff *= n;
            continue;
        }
        if let SymExpr::Exp(base, exp) = factor {
            if let Some(e) = exp.as_num() {
                if *e < 0u32 {
                    denominator.push((base, -e.clone()));
                    continue;
                }
            }
        }
        numerator.push(factor);
    }

    numerator.sort_by_key(|factor| (factor.degree(), canon(factor)));

    let negative = coeff < 0u32;
    let coeff = coeff.abs();
    let (numer_coeff, denom_coeff) = (coeff.numer(), coeff.denom());

    let mut parts: Vec<String> = Vec::new();
    if *numer_coeff != 1u32 || numerator.is_empty() {
        parts.push(numer_coeff.to_string());
    }
    for factor in &numerator {
        parts.push(match factor {
            SymExpr::Add(_) | SymExpr::Mul(_) => format!("\\left({}\\right)", latex(factor)),
            factor => latex(factor),
        });
    }
    let numer_str = parts.join(" ");

    let mut denom_parts: Vec<String> = Vec::new();
    if *denom_coeff != 1u32 {
        denom_parts.push(denom_coeff.to_string());
    }
    for (base, exp) in denominator {
        // no parentheses inside \frac: the bar already groups
        denom_parts.push(if exp == 1u32 {
            latex(base)
        } else {
            latex(&SymExpr::pow((*base).clone(), SymExpr::num(exp)))
        });
    }

    let body = if denom_parts.is_empty() {
        numer_str
    } else {
        format!("\\frac{{{}}}{{{}}}", numer_str, denom_parts.join(" "))
    };

    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

impl SolutionSet {
    /// Renders the solution set in canonical form.
    pub fn canonical(&self) -> String {
        match self {
            SolutionSet::Finite(roots) => {
                let roots = roots.iter().map(canon).collect::<Vec<_>>().join(", ");
                format!("{{{}}}", roots)
            },
            SolutionSet::Empty => "{}".to_string(),
            SolutionSet::AllReal => "Reals".to_string(),
            SolutionSet::Implicit { var, equation } => {
                format!("{{{} | {} = 0}}", var, canon(equation))
            },
        }
    }
}

impl Latex for SolutionSet {
    fn fmt_latex(&self, f: &mut Formatter) -> FmtResult {
        match self {
            SolutionSet::Finite(roots) => {
                let roots = roots.iter().map(latex).collect::<Vec<_>>().join(", ");
                write!(f, "\\left\\{{{}\\right\\}}", roots)
            },
            SolutionSet::Empty => write!(f, "\\varnothing"),
            SolutionSet::AllReal => write!(f, "\\mathbb{{R}}"),
            SolutionSet::Implicit { var, equation } => {
                write!(
                    f,
                    "\\left\\{{{} \\mid {} = 0\\right\\}}",
                    symbol_latex(var),
                    latex(equation)
                )
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::simplify::simplify;
    use crate::symbolic::SymExpr;
    use pretty_assertions::assert_eq;
    use symgraph_parser::parser::Parser;

    fn canonical_of(input: &str) -> String {
        let ast = Parser::new(input).try_parse_full().unwrap();
        canonical(&simplify(&SymExpr::from_ast(&ast).unwrap()))
    }

    fn latex_of(input: &str) -> String {
        let ast = Parser::new(input).try_parse_full().unwrap();
        simplify(&SymExpr::from_ast(&ast).unwrap()).as_display().to_string()
    }

    #[test]
    fn canonical_ordering() {
        assert_eq!(canonical_of("1 + 2*x + x**2"), "x**2 + 2*x + 1");
        assert_eq!(canonical_of("y**2 + x**2 + 2*x*y"), "x**2 + 2*x*y + y**2");
    }

    #[test]
    fn canonical_division() {
        assert_eq!(canonical_of("x / 2"), "x/2");
        assert_eq!(canonical_of("x / (x + 1)"), "x/(x + 1)");
        assert_eq!(canonical_of("3 / (2*x)"), "3/(2*x)");
    }

    #[test]
    fn canonical_powers() {
        assert_eq!(canonical_of("(x + 1)**2"), "(x + 1)**2");
        assert_eq!(canonical_of("x**(0 - 2)"), "x**(-2)");
    }

    #[test]
    fn canonical_reparses_to_itself() {
        for input in ["x**2 + 2*x + 1", "(x + 1)**2", "x/2", "2*sin(x)", "sqrt(2)"] {
            let first = canonical_of(input);
            let second = canonical_of(&first);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn latex_rendering() {
        assert_eq!(latex_of("x / 2"), "\\frac{x}{2}");
        assert_eq!(latex_of("x**2 + 1"), "x^{2} + 1");
        assert_eq!(latex_of("sin(x)"), "\\sin\\left(x\\right)");
        assert_eq!(latex_of("sqrt(2)"), "\\sqrt{2}");
        assert_eq!(latex_of("2*pi"), "2 \\pi");
        assert_eq!(latex_of("(x + 1)**2"), "\\left(x + 1\\right)^{2}");
    }
}
