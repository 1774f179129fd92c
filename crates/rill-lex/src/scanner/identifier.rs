//! Identifier scanning and keyword recognition.
//!
//! Keywords are recognized by a hand-rolled trie: a nested match on the
//! first one or two bytes narrows the candidates to at most one keyword,
//! then the remaining bytes are compared in a single slice check. No hash
//! map, no allocation, no scan of a keyword list.

use crate::scanner::is_alpha;
use crate::token::{Token, TokenKind};
use crate::Scanner;

impl<'src> Scanner<'src> {
    /// Scans an identifier or keyword. The first byte has already been
    /// consumed by the dispatcher.
    pub(crate) fn scan_identifier(&mut self) -> Token<'src> {
        while is_alpha(self.cursor.peek()) || self.cursor.peek().is_ascii_digit() {
            self.cursor.advance();
        }
        self.make_token(identifier_kind(self.cursor.slice_from(self.start)))
    }
}

/// Classifies a scanned identifier lexeme as a keyword or plain identifier.
fn identifier_kind(lexeme: &str) -> TokenKind {
    let bytes = lexeme.as_bytes();
    match bytes[0] {
        b'a' => check_keyword(lexeme, 1, "nd", TokenKind::And),
        b'c' => check_keyword(lexeme, 1, "lass", TokenKind::Class),
        b'e' => check_keyword(lexeme, 1, "lse", TokenKind::Else),
        b'f' if bytes.len() > 1 => match bytes[1] {
            b'a' => check_keyword(lexeme, 2, "lse", TokenKind::False),
            b'n' => check_keyword(lexeme, 2, "", TokenKind::Fn),
            b'o' => check_keyword(lexeme, 2, "r", TokenKind::For),
            _ => TokenKind::Identifier,
        },
        b'i' => check_keyword(lexeme, 1, "f", TokenKind::If),
        b'l' => check_keyword(lexeme, 1, "et", TokenKind::Let),
        b'n' => check_keyword(lexeme, 1, "ull", TokenKind::Null),
        b'o' => check_keyword(lexeme, 1, "r", TokenKind::Or),
        b'p' => check_keyword(lexeme, 1, "rint", TokenKind::Print),
        b'r' => check_keyword(lexeme, 1, "eturn", TokenKind::Return),
        b's' => check_keyword(lexeme, 1, "uper", TokenKind::Super),
        b't' if bytes.len() > 1 => match bytes[1] {
            b'h' => check_keyword(lexeme, 2, "is", TokenKind::This),
            b'r' => check_keyword(lexeme, 2, "ue", TokenKind::True),
            _ => TokenKind::Identifier,
        },
        b'w' => check_keyword(lexeme, 1, "hile", TokenKind::While),
        _ => TokenKind::Identifier,
    }
}

/// Compares the rest of the lexeme after the trie prefix; the keyword kind
/// is returned only on an exact, full-length match.
fn check_keyword(lexeme: &str, start: usize, rest: &str, kind: TokenKind) -> TokenKind {
    if lexeme.len() == start + rest.len() && &lexeme[start..] == rest {
        kind
    } else {
        TokenKind::Identifier
    }
}
