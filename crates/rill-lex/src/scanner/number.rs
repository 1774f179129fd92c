//! Number literal scanning.
//!
//! Number literals are one or more digits with an optional `.digits` tail.
//! There are no exponents, signs, or radix prefixes; `-42` scans as a
//! unary minus applied to `42`. The scanner only delimits the lexeme; the
//! compiler parses it into an f64 when it emits the constant.

use crate::token::Token;
use crate::{Scanner, TokenKind};

impl<'src> Scanner<'src> {
    /// Scans a number literal. The first digit has already been consumed
    /// by the dispatcher.
    pub(crate) fn scan_number(&mut self) -> Token<'src> {
        while self.cursor.peek().is_ascii_digit() {
            self.cursor.advance();
        }

        // A '.' is part of the number only when digits follow it, so that
        // a trailing dot stays available as its own token.
        if self.cursor.peek() == b'.' && self.cursor.peek_next().is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.peek().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        self.make_token(TokenKind::Number)
    }
}
