pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the non-whitespace tokens produced by the tokenizer.
/// Owning the full array allows the parser to peek ahead without re-lexing.
///
/// Whitespace carries no meaning in the grammar (implicit multiplication is decided by token
/// adjacency through spans), so it is dropped here.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(Ok(kind)) = lexer.next() {
        if kind.is_whitespace() {
            continue;
        }

        tokens.push(Token {
            span: lexer.span(),
            kind,
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(
        input: &'source str,
        expected: [(TokenKind, &'source str); N],
    ) {
        let tokens = tokenize_complete(input);
        let found = tokens
            .iter()
            .map(|token| (token.kind, token.lexeme))
            .collect::<Vec<_>>();

        assert_eq!(found, expected);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "1 + 2",
            [
                (TokenKind::Int, "1"),
                (TokenKind::Add, "+"),
                (TokenKind::Int, "2"),
            ],
        );
    }

    #[test]
    fn power_is_not_two_stars() {
        compare_tokens(
            "x**2*y",
            [
                (TokenKind::Name, "x"),
                (TokenKind::Pow, "**"),
                (TokenKind::Int, "2"),
                (TokenKind::Mul, "*"),
                (TokenKind::Name, "y"),
            ],
        );
    }

    #[test]
    fn relations_and_calls() {
        compare_tokens(
            "sin(x) >= 0.5",
            [
                (TokenKind::Name, "sin"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "x"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::GreaterEq, ">="),
                (TokenKind::Float, "0.5"),
            ],
        );
    }

    #[test]
    fn unknown_character() {
        compare_tokens(
            "2 @ 3",
            [
                (TokenKind::Int, "2"),
                (TokenKind::Unknown, "@"),
                (TokenKind::Int, "3"),
            ],
        );
    }
}
