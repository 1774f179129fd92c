//! String literal scanning.
//!
//! Strings are delimited by double quotes, may span lines, and carry no
//! escape sequences; the bytes between the quotes are the string. The
//! lexeme includes both quotes so the token round-trips the source text;
//! the compiler strips them when interning the literal.

use crate::token::Token;
use crate::{Scanner, TokenKind};

impl<'src> Scanner<'src> {
    /// Scans a string literal. The opening quote has already been consumed
    /// by the dispatcher.
    pub(crate) fn scan_string(&mut self) -> Token<'src> {
        while self.cursor.peek() != b'"' && !self.cursor.is_at_end() {
            self.cursor.advance();
        }

        if self.cursor.is_at_end() {
            return self.error_token("Unterminated string.");
        }

        // The closing quote.
        self.cursor.advance();
        self.make_token(TokenKind::String)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_one(source: &str) -> Token<'_> {
        let mut scanner = Scanner::new(source);
        scanner.scan_token()
    }

    #[test]
    fn test_simple_string() {
        let token = scan_one("\"hello\"");
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.lexeme, "\"hello\"");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(scan_one("\"\"").lexeme, "\"\"");
    }

    #[test]
    fn test_multiline_string_counts_lines() {
        let mut scanner = Scanner::new("\"a\nb\" x");
        let token = scanner.scan_token();
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.line, 2);
        assert_eq!(scanner.scan_token().line, 2);
    }

    #[test]
    fn test_unterminated_string() {
        let token = scan_one("\"oops");
        assert_eq!(token.kind, TokenKind::Error);
        assert_eq!(token.lexeme, "Unterminated string.");
    }

    #[test]
    fn test_utf8_passes_through() {
        let token = scan_one("\"héllo wörld\"");
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.lexeme, "\"héllo wörld\"");
    }

    #[test]
    fn test_no_escape_sequences() {
        // A backslash is just a byte; the following quote still closes.
        let mut scanner = Scanner::new(r#""a\" b"#);
        let token = scanner.scan_token();
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.lexeme, r#""a\""#);
    }
}
