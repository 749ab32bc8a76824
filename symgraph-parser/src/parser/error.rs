//! Error kinds produced while parsing an expression.

use symgraph_attrs::ErrorKind;
use symgraph_error::ErrorKind;

/// The expression ended where more input was expected.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of expression",
    labels = ["expected more input here".to_string()],
)]
pub struct UnexpectedEnd;

/// A token appeared somewhere it cannot.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unexpected `{}` in expression", self.lexeme),
    labels = ["this was not expected here".to_string()],
)]
pub struct UnexpectedToken {
    /// The raw lexeme of the offending token.
    pub lexeme: String,
}

/// A character outside the grammar appeared in the expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unrecognized character `{}`", self.lexeme),
    labels = ["this character cannot appear in an expression".to_string()],
    help = "expressions may only contain numbers, symbols, arithmetic operators, and calls to known functions".to_string(),
)]
pub struct UnknownCharacter {
    /// The raw lexeme of the offending token.
    pub lexeme: String,
}

/// An identifier resembling a host-language construct appeared in the expression. These are
/// rejected outright rather than treated as symbols, since they indicate an attempt to smuggle
/// code through the expression channel.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not allowed in an expression", self.word),
    labels = ["this word is reserved".to_string()],
    help = "only plain algebraic input is accepted; expressions cannot name host-language constructs".to_string(),
)]
pub struct ReservedWord {
    /// The offending identifier.
    pub word: String,
}
