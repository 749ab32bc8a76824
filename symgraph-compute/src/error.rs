//! Error kinds produced while converting and evaluating expressions.

use ariadne::Fmt;
use symgraph_attrs::ErrorKind;
use symgraph_error::{ErrorKind, EXPR};

/// The expression calls a function that is not in the allow-list. Nothing outside the allow-list
/// is ever executed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` function does not exist", self.name),
    labels = ["this function".to_string()],
    help = if self.suggestions.is_empty() {
        "only the allow-listed functions may be called from an expression".to_string()
    } else if self.suggestions.len() == 1 {
        format!("did you mean the `{}` function?", (&*self.suggestions[0]).fg(EXPR))
    } else {
        format!(
            "did you mean one of these functions? {}",
            self.suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    },
)]
pub struct DisallowedFunction {
    /// The name of the function that was called.
    pub name: String,

    /// A list of similarly named allowed functions, if any.
    pub suggestions: Vec<String>,
}

/// The wrong number of arguments was given to an allowed function.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("wrong number of arguments for the `{}` function", self.name),
    labels = ["this function call".to_string()],
    help = format!(
        "the `{}` function takes {} argument(s); there are {} argument(s) provided here",
        (&self.name).fg(EXPR),
        self.expected,
        self.given
    ),
)]
pub struct ArityMismatch {
    /// The name of the function that was called.
    pub name: String,

    /// The number of arguments that were expected.
    pub expected: usize,

    /// The number of arguments that were given.
    pub given: usize,
}

/// A comparison operator appeared where a plain algebraic expression was required.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "comparison operators cannot appear inside an algebraic expression",
    labels = ["this operator".to_string()],
    help = "an equation is only accepted at the top level of a `solve` task or a constraint".to_string(),
)]
pub struct MisplacedRelation;

/// The expression was asked for a numeric value but still contains free symbols.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!(
        "cannot evaluate to a number: the expression still contains {}",
        self.symbols
            .iter()
            .map(|s| format!("`{}`", s.fg(EXPR)))
            .collect::<Vec<_>>()
            .join(", ")
    ),
    labels = ["this expression".to_string()],
)]
pub struct NonNumericResult {
    /// The free symbols that remain after simplification.
    pub symbols: Vec<String>,
}

/// The expression divides by zero.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "this expression divides by zero",
    labels = ["while evaluating this expression".to_string()],
)]
pub struct DivisionByZero;

/// The expression does not evaluate to a real number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` does not produce a real number here", self.context),
    labels = ["while evaluating this expression".to_string()],
    help = "evaluation is restricted to the real numbers".to_string(),
)]
pub struct ComplexValue {
    /// The function or operator that left the reals.
    pub context: String,
}

/// The expression evaluates to an infinite or undefined value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "the expression does not evaluate to a finite number",
    labels = ["while evaluating this expression".to_string()],
)]
pub struct NotFinite;
