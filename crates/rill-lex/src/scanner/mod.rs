//! Scanner implementation.
//!
//! This module organizes the scanner into smaller, focused components:
//! - `mod` (this file) - the `Scanner` struct and token dispatch
//! - `comment` - whitespace and line-comment skipping
//! - `identifier` - identifier scanning and the keyword trie
//! - `number` - number literal scanning
//! - `string` - string literal scanning

mod comment;
mod identifier;
mod number;
mod string;

use tracing::trace;

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Scanner for Rill source code.
///
/// The scanner hands out one token per [`Scanner::scan_token`] call; the
/// compiler drives it on demand and never looks more than one token ahead.
/// After the end of input it keeps returning `Eof` tokens.
pub struct Scanner<'src> {
    /// Byte cursor over the source.
    pub(crate) cursor: Cursor<'src>,

    /// Byte offset where the current lexeme starts.
    pub(crate) start: usize,
}

impl<'src> Scanner<'src> {
    /// Creates a new scanner over the given source code.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            start: 0,
        }
    }

    /// Scans and returns the next token.
    ///
    /// Skips whitespace and comments, then classifies by the first byte of
    /// the lexeme: identifiers and keywords, numbers, strings, punctuation,
    /// or one of the one-or-two-byte operators. Unrecognized bytes produce
    /// an error token and are consumed so scanning can continue.
    pub fn scan_token(&mut self) -> Token<'src> {
        self.skip_whitespace();

        self.start = self.cursor.position();

        if self.cursor.is_at_end() {
            return self.make_token(TokenKind::Eof);
        }

        let byte = self.cursor.advance();

        if is_alpha(byte) {
            return self.scan_identifier();
        }
        if byte.is_ascii_digit() {
            return self.scan_number();
        }

        match byte {
            b'(' => self.make_token(TokenKind::LeftParen),
            b')' => self.make_token(TokenKind::RightParen),
            b'{' => self.make_token(TokenKind::LeftBrace),
            b'}' => self.make_token(TokenKind::RightBrace),
            b';' => self.make_token(TokenKind::Semicolon),
            b',' => self.make_token(TokenKind::Comma),
            b'.' => self.make_token(TokenKind::Dot),
            b'-' => self.make_token(TokenKind::Minus),
            b'+' => self.make_token(TokenKind::Plus),
            b'/' => self.make_token(TokenKind::Slash),
            b'*' => self.make_token(TokenKind::Star),
            b'!' => {
                let kind = if self.cursor.match_byte(b'=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.make_token(kind)
            }
            b'=' => {
                let kind = if self.cursor.match_byte(b'=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.make_token(kind)
            }
            b'<' => {
                let kind = if self.cursor.match_byte(b'=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.make_token(kind)
            }
            b'>' => {
                let kind = if self.cursor.match_byte(b'=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.make_token(kind)
            }
            b'"' => self.scan_string(),
            _ => self.error_token("Unexpected character."),
        }
    }

    /// Makes a token of the given kind from the current lexeme.
    pub(crate) fn make_token(&self, kind: TokenKind) -> Token<'src> {
        let token = Token {
            kind,
            lexeme: self.cursor.slice_from(self.start),
            line: self.cursor.line(),
        };
        trace!(
            kind = %token.kind,
            lexeme = token.lexeme,
            line = token.line,
            "scanned token"
        );
        token
    }

    /// Makes an error token carrying a static message in place of a lexeme.
    pub(crate) fn error_token(&self, message: &'static str) -> Token<'src> {
        trace!(message, line = self.cursor.line(), "scanned error token");
        Token {
            kind: TokenKind::Error,
            lexeme: message,
            line: self.cursor.line(),
        }
    }
}

/// Identifier start/continue bytes: ASCII letters and underscore.
pub(crate) fn is_alpha(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut scanner = Scanner::new(source);
        let mut kinds = Vec::new();
        loop {
            let token = scanner.scan_token();
            let kind = token.kind;
            kinds.push(kind);
            if kind == TokenKind::Eof {
                return kinds;
            }
        }
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("(){};,.-+/*"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Semicolon,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Minus,
                TokenKind::Plus,
                TokenKind::Slash,
                TokenKind::Star,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_one_or_two_byte_operators() {
        assert_eq!(
            kinds("! != = == < <= > >="),
            vec![
                TokenKind::Bang,
                TokenKind::BangEqual,
                TokenKind::Equal,
                TokenKind::EqualEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_statement_tokens() {
        assert_eq!(
            kinds("let answer = 42;"),
            vec![
                TokenKind::Let,
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::Number,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let mut scanner = Scanner::new("@");
        let token = scanner.scan_token();
        assert_eq!(token.kind, TokenKind::Error);
        assert_eq!(token.lexeme, "Unexpected character.");
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut scanner = Scanner::new("x");
        assert_eq!(scanner.scan_token().kind, TokenKind::Identifier);
        assert_eq!(scanner.scan_token().kind, TokenKind::Eof);
        assert_eq!(scanner.scan_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_token_line_numbers() {
        let mut scanner = Scanner::new("a\nb\n\nc");
        assert_eq!(scanner.scan_token().line, 1);
        assert_eq!(scanner.scan_token().line, 2);
        assert_eq!(scanner.scan_token().line, 4);
    }
}
