use logos::Logos;
use std::ops::Range;

/// The different kinds of tokens that can be produced by the tokenizer.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t\n\r]+")]
    Whitespace,

    #[token("**")]
    Pow,

    #[token("^")]
    Caret,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    #[token("==")]
    EqEq,

    #[token("=")]
    Eq,

    #[token("!=")]
    NotEq,

    #[token(">=")]
    GreaterEq,

    #[token(">")]
    Greater,

    #[token("<=")]
    LessEq,

    #[token("<")]
    Less,

    #[token(",")]
    Comma,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[regex(r"[0-9]+\.[0-9]+")]
    Float,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Name,

    #[regex(r".", priority = 0)]
    Unknown,
}

impl TokenKind {
    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }

    /// Returns true if a token of this kind can begin an atom, which is how the parser decides
    /// whether two adjacent operands form an implicit multiplication.
    pub fn starts_atom(self) -> bool {
        matches!(
            self,
            TokenKind::OpenParen | TokenKind::Name | TokenKind::Int | TokenKind::Float,
        )
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'source> {
    /// The region of the source text that this token originated from.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,

    /// The raw lexeme that was parsed into this token.
    pub lexeme: &'source str,
}
