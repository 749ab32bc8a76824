//! Scanning and substitution of `[[CAS:<id>]]` reference tokens.
//!
//! The same token syntax serves two purposes: inside a task's expression it chains computations
//! (the token is replaced by the referenced result's canonical form before evaluation), and
//! inside a template it requests the typeset form (handled by [`crate::template`]).

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// The documented reference-token syntax.
pub static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[CAS:([A-Za-z0-9_\-]+)\]\]").unwrap());

/// One reference token found in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefToken {
    /// The referenced task id.
    pub id: String,

    /// Where the token sits in the text.
    pub span: Range<usize>,
}

/// Finds every reference token in the text, left to right.
pub fn scan(text: &str) -> Vec<RefToken> {
    PLACEHOLDER
        .captures_iter(text)
        .map(|caps| {
            let whole = caps.get(0).unwrap();
            RefToken { id: caps[1].to_string(), span: whole.range() }
        })
        .collect()
}

/// Replaces every reference token using the lookup, wrapping each replacement in parentheses so
/// the substituted text keeps its precedence no matter what surrounds the token. Tokens the
/// lookup cannot resolve are left in place.
pub fn substitute(text: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        let Some(replacement) = lookup(&caps[1]) else { continue };

        out.push_str(&text[last..whole.start()]);
        out.push('(');
        out.push_str(&replacement);
        out.push(')');
        last = whole.end();
    }

    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanning() {
        let tokens = scan("[[CAS:1]] * 3 + [[CAS:a-b_2]]");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].id, "1");
        assert_eq!(tokens[0].span, 0..9);
        assert_eq!(tokens[1].id, "a-b_2");
    }

    #[test]
    fn substitution_parenthesizes() {
        let out = substitute("[[CAS:1]] * 3", |id| (id == "1").then(|| "1 + 1".to_string()));
        assert_eq!(out, "(1 + 1) * 3");
    }

    #[test]
    fn unresolved_tokens_are_left_alone() {
        let out = substitute("[[CAS:missing]]", |_| None);
        assert_eq!(out, "[[CAS:missing]]");
    }
}
