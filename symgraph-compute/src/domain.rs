//! Domain restrictions that can be assumed for a variable.

use std::{fmt, str::FromStr};

/// A restriction on the values a variable may take. Solutions outside the domain are discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Domain {
    /// Any real number. This is the default assumption.
    #[default]
    Real,

    /// Strictly positive real numbers.
    Positive,

    /// Strictly negative real numbers.
    Negative,

    /// Any real number except zero.
    Nonzero,

    /// Integers only.
    Integer,
}

impl FromStr for Domain {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "real" | "reals" | "default" => Ok(Domain::Real),
            "positive" => Ok(Domain::Positive),
            "negative" => Ok(Domain::Negative),
            "nonzero" => Ok(Domain::Nonzero),
            "integer" | "integers" => Ok(Domain::Integer),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Real => write!(f, "real"),
            Domain::Positive => write!(f, "positive"),
            Domain::Negative => write!(f, "negative"),
            Domain::Nonzero => write!(f, "nonzero"),
            Domain::Integer => write!(f, "integer"),
        }
    }
}
