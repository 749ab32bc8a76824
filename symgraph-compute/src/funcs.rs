//! The closed table of functions that expressions are allowed to call.
//!
//! This table is the allow-list boundary of the evaluator: a call to any name not listed here is
//! rejected during conversion to the symbolic representation, before anything is executed.
//! Expressions frequently come from a generative model, so near-miss names are answered with
//! suggestions.

use levenshtein::levenshtein;
use rug::Float;

/// A function callable from expressions.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    /// The name of the function as written in expressions.
    pub name: &'static str,

    /// The number of arguments the function takes.
    pub arity: usize,

    /// The LaTeX command used to typeset calls to the function.
    pub latex: &'static str,

    /// The numeric implementation over the working precision.
    numeric: fn(Float) -> Float,
}

impl Builtin {
    /// Applies the numeric implementation to the argument.
    pub fn numeric(&self, arg: Float) -> Float {
        (self.numeric)(arg)
    }
}

fn sin_f(x: Float) -> Float {
    x.sin()
}

fn cos_f(x: Float) -> Float {
    x.cos()
}

fn tan_f(x: Float) -> Float {
    x.tan()
}

fn sqrt_f(x: Float) -> Float {
    x.sqrt()
}

/// Every function callable from expressions.
static BUILTINS: &[Builtin] = &[
    Builtin { name: "sin", arity: 1, latex: "\\sin", numeric: sin_f },
    Builtin { name: "cos", arity: 1, latex: "\\cos", numeric: cos_f },
    Builtin { name: "tan", arity: 1, latex: "\\tan", numeric: tan_f },
    Builtin { name: "sqrt", arity: 1, latex: "\\sqrt", numeric: sqrt_f },
];

/// Looks up a function by name.
pub fn get(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|builtin| builtin.name == name)
}

/// Returns the names of functions spelled similarly to the given name.
pub fn suggestions(name: &str) -> Vec<String> {
    BUILTINS
        .iter()
        .filter(|builtin| levenshtein(name, builtin.name) <= 2)
        .map(|builtin| builtin.name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        assert_eq!(get("sin").unwrap().arity, 1);
        assert!(get("eval").is_none());
    }

    #[test]
    fn near_miss_suggestions() {
        assert_eq!(suggestions("sim"), vec!["sin".to_string()]);
        assert!(suggestions("frobnicate").is_empty());
    }
}
