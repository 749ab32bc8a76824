//! Rewrites a human- or model-authored expression string into the canonical spelling accepted by
//! the tokenizer.
//!
//! Normalization is a fixed, order-sensitive sequence of five rules:
//!
//! 1. Unicode operator folding (`×` → `*`, typographic minus → `-`, and so on).
//! 2. LaTeX rewriting: `\frac{a}{b}` → `(a)/(b)` with balanced-brace scanning, `\left`/`\right`
//!    stripped, known command names unescaped, remaining braces converted to parentheses.
//! 3. Exponent rewriting: `^` → `**`.
//! 4. Implicit multiplication insertion between directly adjacent operands: a number followed by
//!    a symbol or an opening parenthesis (`2x`, `2(x+1)`), and a closing parenthesis followed by
//!    an operand (`)(`, `)x`, `)2`). A name followed by `(` is left alone: that spelling is a
//!    function call, and whether the function exists is the evaluator's allow-list to decide.
//! 5. Whitespace folding.
//!
//! Each rule is idempotent and no rule produces input for an earlier one, so normalizing an
//! already-canonical string is a no-op. The rules never change the mathematical meaning of the
//! expression; a string that is still not well-formed afterwards is rejected by the parser.

/// LaTeX commands that are unescaped to plain spellings before the remaining backslashes are
/// dropped.
const COMMANDS: &[(&str, &str)] = &[
    ("\\cdot", "*"),
    ("\\times", "*"),
    ("\\div", "/"),
    ("\\sin", "sin"),
    ("\\cos", "cos"),
    ("\\tan", "tan"),
    ("\\sqrt", "sqrt"),
    ("\\pi", "pi"),
];

/// Rewrites raw expression strings into the canonical spelling.
#[derive(Debug, Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    /// Creates a normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Applies the full rule sequence to the input.
    pub fn normalize(&self, input: &str) -> String {
        let folded = fold_unicode(input);
        let unlatexed = rewrite_latex(&folded);
        let powered = unlatexed.replace('^', "**");
        let multiplied = insert_implicit_mul(&powered);
        fold_whitespace(&multiplied)
    }
}

/// Inserts `*` between directly adjacent operands where no operator is present.
fn insert_implicit_mul(input: &str) -> String {
    let chars = input.chars().collect::<Vec<_>>();
    let mut out = String::with_capacity(input.len());

    for i in 0..chars.len() {
        out.push(chars[i]);

        let Some(&next) = chars.get(i + 1) else { break };
        let cur = chars[i];

        let insert = if cur == ')' {
            next == '(' || next.is_ascii_alphanumeric() || next == '_'
        } else if cur.is_ascii_digit() && (next.is_ascii_alphabetic() || next == '_' || next == '(')
        {
            // only when the digit ends a number; in an identifier like `x2`, the digit belongs
            // to the name (and `x2(` stays a call for the allow-list to judge)
            matches!(
                token_ending_at(&chars, i),
                Some(token) if token.chars().all(|c| c.is_ascii_digit() || c == '.')
            )
        } else {
            false
        };

        if insert {
            out.push('*');
        }
    }

    out
}

/// Returns the number or identifier token that ends at (and includes) `chars[end]`, if any.
fn token_ending_at(chars: &[char], end: usize) -> Option<String> {
    if !(chars[end].is_ascii_alphanumeric() || chars[end] == '_' || chars[end] == '.') {
        return None;
    }

    let mut start = end;
    while start > 0 {
        let prev = chars[start - 1];
        if prev.is_ascii_alphanumeric() || prev == '_' || prev == '.' {
            start -= 1;
        } else {
            break;
        }
    }

    Some(chars[start..=end].iter().collect())
}

/// Folds visually-similar Unicode operator glyphs into their ASCII equivalents.
fn fold_unicode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for c in input.chars() {
        match c {
            '−' | '–' | '—' | '‒' | '―' => out.push('-'),
            '×' | '⋅' | '·' | '∗' => out.push('*'),
            '÷' | '∕' | '⁄' => out.push('/'),
            '≤' => out.push_str("<="),
            '≥' => out.push_str(">="),
            '≠' => out.push_str("!="),
            '\u{a0}' | '\u{2000}'..='\u{200b}' | '\u{202f}' => out.push(' '),
            _ => out.push(c),
        }
    }

    out
}

/// Strips LaTeX markup: `\frac{a}{b}` becomes `(a)/(b)`, `\left`/`\right` disappear, known
/// commands are unescaped, and whatever braces and backslashes remain are folded away.
fn rewrite_latex(input: &str) -> String {
    let mut text = input.replace("\\left", "").replace("\\right", "");

    // nested fractions resolve over multiple passes; a pass that changes nothing ends the loop,
    // which also covers malformed fractions copied through verbatim
    loop {
        let rewritten = rewrite_fractions_once(&text);
        if rewritten == text {
            break;
        }
        text = rewritten;
    }

    for (command, plain) in COMMANDS {
        text = text.replace(command, plain);
    }

    text.chars()
        .filter(|&c| c != '\\')
        .map(|c| match c {
            '{' => '(',
            '}' => ')',
            c => c,
        })
        .collect()
}

/// Rewrites every well-formed `\frac{a}{b}` found in one left-to-right scan. The contents of the
/// brace groups are copied verbatim, so inner fractions are handled by later passes.
fn rewrite_fractions_once(input: &str) -> String {
    let chars = input.chars().collect::<Vec<_>>();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i..].starts_with(&['\\', 'f', 'r', 'a', 'c']) {
            if let Some((numerator, after_numerator)) = brace_group(&chars, i + 5) {
                if let Some((denominator, rest)) = brace_group(&chars, after_numerator) {
                    out.push('(');
                    out.push_str(&numerator);
                    out.push_str(")/(");
                    out.push_str(&denominator);
                    out.push(')');
                    i = rest;
                    continue;
                }
            }
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}

/// Reads one balanced `{...}` group starting at or after `start` (skipping whitespace), returning
/// its contents and the index one past the closing brace.
fn brace_group(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut i = start;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }

    if chars.get(i) != Some(&'{') {
        return None;
    }

    let mut depth = 0usize;
    let mut content = String::new();
    for (j, &c) in chars.iter().enumerate().skip(i) {
        match c {
            '{' => {
                if depth > 0 {
                    content.push(c);
                }
                depth += 1;
            },
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((content, j + 1));
                }
                content.push(c);
            },
            c => content.push(c),
        }
    }

    None
}

/// Collapses whitespace runs into single spaces and trims the ends.
fn fold_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn normalize(input: &str) -> String {
        Normalizer::new().normalize(input)
    }

    #[test]
    fn canonical_input_is_untouched() {
        let inputs = [
            "x**2 + 2*x + 1",
            "(a)/(b)",
            "sin(x) + 2*cos(x)",
            "3*x*y - 4",
            "2.5*x",
        ];

        for input in inputs {
            assert_eq!(normalize(input), input);
        }
    }

    #[test]
    fn idempotence() {
        let inputs = [
            "2x^2 − 3×y",
            r"\frac{x+1}{x-1} + 2x",
            "2(x+1)(x-1)",
            "(x+1)x",
        ];

        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn unicode_folding() {
        assert_eq!(normalize("3×x − 2"), "3*x - 2");
        assert_eq!(normalize("x ÷ 2 ⋅ y"), "x / 2 * y");
        assert_eq!(normalize("x ≥ 0"), "x >= 0");
    }

    #[test]
    fn fractions() {
        assert_eq!(normalize(r"\frac{1}{2}"), "(1)/(2)");
        assert_eq!(normalize(r"\frac{x + 1}{x - 1}"), "(x + 1)/(x - 1)");
        // nested numerator
        assert_eq!(normalize(r"\frac{\frac{1}{2}}{3}"), "((1)/(2))/(3)");
        // \left/\right and braces fold away
        assert_eq!(normalize(r"\left(x + 1\right)^{2}"), "(x + 1)**(2)");
    }

    #[test]
    fn exponents() {
        assert_eq!(normalize("x^2"), "x**2");
        assert_eq!(normalize("x**2"), "x**2");
        assert_eq!(normalize("x^-2"), "x**-2");
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(normalize("2x"), "2*x");
        assert_eq!(normalize("2x + 3y"), "2*x + 3*y");
        assert_eq!(normalize("2(x+1)"), "2*(x+1)");
        assert_eq!(normalize("(x+1)(x-1)"), "(x+1)*(x-1)");
        assert_eq!(normalize("(x+1)x"), "(x+1)*x");
        assert_eq!(normalize("2.5x"), "2.5*x");
        assert_eq!(normalize("2sin(x)"), "2*sin(x)");
    }

    #[test]
    fn call_spellings_are_preserved() {
        // the allow-list, not the normalizer, decides whether these calls exist
        assert_eq!(normalize("sin(x)"), "sin(x)");
        assert_eq!(normalize("k(x + 1)"), "k(x + 1)");
        assert_eq!(normalize("x2(x + 1)"), "x2(x + 1)");
    }

    #[test]
    fn identifier_digits_are_not_split() {
        assert_eq!(normalize("x2y"), "x2y");
        assert_eq!(normalize("x2 + 1"), "x2 + 1");
    }

    #[test]
    fn latex_commands() {
        assert_eq!(normalize(r"\sin(x) \cdot 2"), "sin(x) * 2");
        assert_eq!(normalize(r"\sqrt{2}"), "sqrt(2)");
        assert_eq!(normalize(r"2\pi"), "2*pi");
    }
}
