//! Scanner edge cases and property tests.
//!
//! The properties pinned here are the ones later phases rely on: the
//! scanner never panics, never loops, never goes back a line, and lexemes
//! of non-error tokens cover exactly the non-whitespace, non-comment
//! bytes of the source.

use proptest::prelude::*;

use crate::{Scanner, Token, TokenKind};

fn scan_all(source: &str) -> Vec<Token<'_>> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.scan_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

#[test]
fn test_windows_line_endings() {
    let tokens = scan_all("a\r\nb");
    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[1].line, 2);
}

#[test]
fn test_comment_only_lines_still_count() {
    let tokens = scan_all("// one\n// two\nx");
    assert_eq!(tokens[0].line, 3);
}

#[test]
fn test_adjacent_operators_do_not_merge() {
    // `===` is `==` then `=`, never three tokens or an error.
    let kinds: Vec<_> = scan_all("===").iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::EqualEqual, TokenKind::Equal, TokenKind::Eof]
    );
}

#[test]
fn test_bang_bang() {
    let kinds: Vec<_> = scan_all("!!x").iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Bang,
            TokenKind::Bang,
            TokenKind::Identifier,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_error_token_does_not_stop_scanning() {
    let kinds: Vec<_> = scan_all("a @ b").iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Error,
            TokenKind::Identifier,
            TokenKind::Eof
        ]
    );
}

/// Strips whitespace and `//` comments the same way the scanner does,
/// used to state the partition property.
fn significant_bytes(source: &str) -> Vec<u8> {
    let bytes = source.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' | b'\r' | b'\n' => i += 1,
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    out
}

proptest! {
    /// The scanner terminates without panicking on arbitrary input.
    #[test]
    fn prop_never_panics(source in "\\PC*") {
        let tokens = scan_all(&source);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    /// Token lines never decrease.
    #[test]
    fn prop_lines_monotonic(source in "[a-z0-9+\\-*/ \n\"(){};]*") {
        let tokens = scan_all(&source);
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].line <= pair[1].line);
        }
    }

    /// Over sources with no string literals or stray bytes, the lexemes
    /// partition the significant bytes of the source exactly.
    #[test]
    fn prop_lexemes_partition_source(
        source in "[a-z0-9 \n;+\\-*/(){}=<>!,.]*"
    ) {
        let tokens = scan_all(&source);
        let mut concatenated = Vec::new();
        for token in &tokens {
            if token.kind != TokenKind::Eof && token.kind != TokenKind::Error {
                concatenated.extend_from_slice(token.lexeme.as_bytes());
            }
        }
        prop_assert_eq!(concatenated, significant_bytes(&source));
    }

    /// Scanning an identifier-shaped string yields one token with the
    /// same lexeme (keywords excluded by the leading capital).
    #[test]
    fn prop_identifier_round_trip(name in "[A-Z][a-zA-Z0-9_]{0,20}") {
        let tokens = scan_all(&name);
        prop_assert_eq!(tokens.len(), 2);
        prop_assert_eq!(tokens[0].kind, TokenKind::Identifier);
        prop_assert_eq!(tokens[0].lexeme, name.as_str());
    }
}
