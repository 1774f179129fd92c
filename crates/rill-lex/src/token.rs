//! Token model.
//!
//! Tokens borrow their lexeme from the source string, so the token stream
//! is free of allocation. Error tokens reuse the lexeme field for a static
//! message; the compiler reports it when the token reaches the parser.

use std::fmt;

/// Every kind of token the scanner can produce.
///
/// The discriminant order groups kinds the way the compiler's rule table
/// thinks about them: punctuation, operators, literals, keywords, then the
/// two stream markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    String,
    Number,

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fn,
    For,
    If,
    Let,
    Null,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    While,

    // Stream markers.
    Error,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One scanned token: its kind, its source slice, and the line it ended on.
///
/// For `TokenKind::Error` the lexeme holds the error message instead of
/// source text. For `TokenKind::String` the lexeme includes both quotes;
/// the compiler strips them when it interns the literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'src> {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// The slice of source text (or a static message for error tokens).
    pub lexeme: &'src str,
    /// Source line (1-based).
    pub line: usize,
}

impl<'src> Token<'src> {
    /// A synthetic token for initializing parser state before the first
    /// `advance`. Never observed by any rule.
    pub fn synthetic() -> Self {
        Self {
            kind: TokenKind::Eof,
            lexeme: "",
            line: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_equality() {
        assert_eq!(TokenKind::Let, TokenKind::Let);
        assert_ne!(TokenKind::Let, TokenKind::Identifier);
    }

    #[test]
    fn test_token_carries_lexeme_and_line() {
        let token = Token {
            kind: TokenKind::Identifier,
            lexeme: "foo",
            line: 4,
        };
        assert_eq!(token.lexeme, "foo");
        assert_eq!(token.line, 4);
    }
}
