//! Parser state and token plumbing.
//!
//! The parser owns the scanner and pulls tokens on demand, keeping
//! exactly `previous` and `current`. Scanner error tokens are reported
//! the moment they pass through `advance`, so by the time any rule looks
//! at `previous` it is always a real token.

use rill_lex::{Scanner, Token, TokenKind};
use rill_runtime::{FunObj, Heap};
use rill_util::{Diagnostic, Handler, Location};

use crate::locals::{FunCompiler, FunctionKind};

pub(crate) struct Parser<'src, 'ctx> {
    scanner: Scanner<'src>,
    pub(crate) heap: &'ctx mut Heap,
    handler: &'ctx mut Handler,
    pub(crate) current: Token<'src>,
    pub(crate) previous: Token<'src>,
    panic_mode: bool,
    pub(crate) compiler: Box<FunCompiler<'src>>,
}

impl<'src, 'ctx> Parser<'src, 'ctx> {
    pub(crate) fn new(source: &'src str, heap: &'ctx mut Heap, handler: &'ctx mut Handler) -> Self {
        Self {
            scanner: Scanner::new(source),
            heap,
            handler,
            current: Token::synthetic(),
            previous: Token::synthetic(),
            panic_mode: false,
            compiler: Box::new(FunCompiler::new(FunctionKind::Script, None)),
        }
    }

    /// Consumes one token. Scanner error tokens are reported here and
    /// skipped, so rules only ever see real tokens.
    pub(crate) fn advance(&mut self) {
        self.previous = self.current;
        loop {
            self.current = self.scanner.scan_token();
            if self.current.kind != TokenKind::Error {
                break;
            }
            let message = self.current.lexeme;
            self.error_at_current(message);
        }
    }

    /// Consumes the current token iff it matches, else reports `message`.
    pub(crate) fn consume(&mut self, kind: TokenKind, message: &str) {
        if self.check(kind) {
            self.advance();
        } else {
            self.error_at_current(message);
        }
    }

    /// Non-fatal single-token match.
    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.advance();
        true
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Reports an error at the just-consumed token.
    pub(crate) fn error(&mut self, message: &str) {
        self.error_at(self.previous, message);
    }

    /// Reports an error at the not-yet-consumed token.
    pub(crate) fn error_at_current(&mut self, message: &str) {
        self.error_at(self.current, message);
    }

    fn error_at(&mut self, token: Token<'src>, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;

        let location = match token.kind {
            TokenKind::Eof => Location::End,
            // The lexeme of an error token is the message itself.
            TokenKind::Error => Location::Bare,
            _ => Location::At(token.lexeme.to_string()),
        };
        self.handler
            .emit(Diagnostic::error(token.line, location, message));
    }

    pub(crate) fn in_panic_mode(&self) -> bool {
        self.panic_mode
    }

    /// Leaves panic mode by skipping to a statement boundary: just past a
    /// semicolon, or just before a token that begins a declaration or
    /// statement.
    pub(crate) fn synchronize(&mut self) {
        self.panic_mode = false;

        while self.current.kind != TokenKind::Eof {
            if self.previous.kind == TokenKind::Semicolon {
                return;
            }
            match self.current.kind {
                TokenKind::Class
                | TokenKind::Fn
                | TokenKind::Let
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => self.advance(),
            }
        }
    }

    /// Finalizes the top-level script: emits the implicit return and
    /// yields the function object.
    pub(crate) fn finish(mut self) -> FunObj {
        self.emit_return();
        self.compiler.take_function()
    }
}
