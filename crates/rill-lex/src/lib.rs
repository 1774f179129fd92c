//! rill-lex - Lexical Analyzer (Scanner)
//!
//! ============================================================================
//! LEXICAL ANALYSIS OVERVIEW
//! ============================================================================
//!
//! The scanner transforms a stream of bytes into a stream of tokens. It is
//! the first phase of the interpreter and the only one that looks at raw
//! source text.
//!
//! PROPERTIES:
//! -----------
//! - Linear time: O(n) in the source length
//! - Single pass, one token of lookahead from the compiler's side
//! - On demand: the compiler pulls tokens; no token vector is built
//!
//! LEXEME vs TOKEN:
//! ----------------
//! - Lexeme: the actual slice of source text (e.g. `let`, `123`, `+`)
//! - Token: the classified lexeme plus its source line
//!
//! ```text
//! Source:  "let x = 42;"
//!
//! Lexemes: "let"  "x"  "="  "42"  ";"
//! Tokens:  [Let] [Identifier] [Equal] [Number] [Semicolon] [Eof]
//! ```
//!
//! TOKEN CATEGORIES:
//! -----------------
//! 1. Punctuation: `( ) { } , . ; + - * /`
//! 2. One-or-two-character operators: `! != = == < <= > >=`
//! 3. Literals: numbers (`42`, `3.14`), strings (`"hi"`)
//! 4. Identifiers: `[a-zA-Z_][a-zA-Z0-9_]*` (ASCII only)
//! 5. Keywords: `and class else false fn for if let null or print return
//!    super this true while`
//! 6. Error and Eof markers
//!
//! Errors are not reported here. The scanner produces `TokenKind::Error`
//! tokens whose lexeme is the message text; the compiler turns them into
//! diagnostics when they reach it. This keeps the scanner infallible and
//! the error-reporting policy (panic mode, synchronization) in one place.
//!
//! String literals may span lines and may contain arbitrary UTF-8 bytes;
//! everything the scanner itself inspects is ASCII, so scanning works on
//! bytes with no decoding step.

pub mod cursor;
mod scanner;
mod token;

#[cfg(test)]
mod edge_cases;

pub use scanner::Scanner;
pub use token::{Token, TokenKind};
