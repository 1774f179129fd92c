//! Statement and declaration compilation.
//!
//! Statements leave the stack the way they found it: expression
//! statements pop their value, control flow pops its condition on both
//! edges, and block scopes pop their locals on exit. That balance is what
//! lets the compiler track locals by slot index alone.

use rill_lex::TokenKind;
use rill_runtime::OpCode;

use crate::locals::{FunCompiler, FunctionKind};
use crate::parser::Parser;

impl<'src, 'ctx> Parser<'src, 'ctx> {
    /// declaration → fn_declaration | var_declaration | statement
    pub(crate) fn declaration(&mut self) {
        if self.match_token(TokenKind::Fn) {
            self.fn_declaration();
        } else if self.match_token(TokenKind::Let) {
            self.var_declaration();
        } else {
            self.statement();
        }

        if self.in_panic_mode() {
            self.synchronize();
        }
    }

    fn statement(&mut self) {
        if self.match_token(TokenKind::Print) {
            self.print_statement();
        } else if self.match_token(TokenKind::If) {
            self.if_statement();
        } else if self.match_token(TokenKind::Return) {
            self.return_statement();
        } else if self.match_token(TokenKind::While) {
            self.while_statement();
        } else if self.match_token(TokenKind::For) {
            self.for_statement();
        } else if self.match_token(TokenKind::LeftBrace) {
            self.begin_scope();
            self.block();
            self.end_scope();
        } else {
            self.expression_statement();
        }
    }

    /// `let NAME [= expr] ;` with missing initializers defaulting to null.
    fn var_declaration(&mut self) {
        let global = self.parse_variable("Expected variable name.");

        if self.match_token(TokenKind::Equal) {
            self.expression();
        } else {
            self.emit_op(OpCode::Null);
        }
        self.consume(
            TokenKind::Semicolon,
            "Expected ';' after variable declaration.",
        );

        self.define_variable(global);
    }

    /// `fn NAME ( params ) { body }`. The name is bound before the body
    /// compiles so the function can call itself.
    fn fn_declaration(&mut self) {
        let global = self.parse_variable("Expected function name.");
        self.mark_initialized();
        self.function();
        self.define_variable(global);
    }

    /// Compiles one function body under a fresh compiler state and emits
    /// the finished function as a constant.
    fn function(&mut self) {
        let name = self.heap.intern(self.previous.lexeme);
        self.push_compiler(FunctionKind::Function, name);
        self.begin_scope();

        self.consume(TokenKind::LeftParen, "Expected '(' after function name.");
        if !self.check(TokenKind::RightParen) {
            loop {
                if self.compiler.function.arity == u8::MAX {
                    self.error_at_current("Can't have more than 255 parameters.");
                } else {
                    self.compiler.function.arity += 1;
                }
                let constant = self.parse_variable("Expected parameter name.");
                self.define_variable(constant);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expected ')' after parameters.");
        self.consume(TokenKind::LeftBrace, "Expected '{' before function body.");
        self.block();

        let function = self.pop_compiler();
        let handle = self.heap.alloc_function(function);
        self.emit_constant(rill_runtime::Value::Obj(handle));
    }

    fn push_compiler(&mut self, kind: FunctionKind, name: rill_runtime::ObjRef) {
        let fresh = Box::new(FunCompiler::new(kind, Some(name)));
        let enclosing = std::mem::replace(&mut self.compiler, fresh);
        self.compiler.enclosing = Some(enclosing);
    }

    fn pop_compiler(&mut self) -> rill_runtime::FunObj {
        self.emit_return();
        let function = self.compiler.take_function();
        let enclosing = match self.compiler.enclosing.take() {
            Some(enclosing) => enclosing,
            None => unreachable!("function compiler always has an enclosing state"),
        };
        self.compiler = enclosing;
        function
    }

    fn print_statement(&mut self) {
        self.expression();
        self.consume(TokenKind::Semicolon, "Expected ';' after value.");
        self.emit_op(OpCode::Print);
    }

    /// `return [expr] ;`. Bare returns yield null; returning from the
    /// top level is a compile error.
    fn return_statement(&mut self) {
        if self.compiler.kind == FunctionKind::Script {
            self.error("Can't return from top-level code.");
        }

        if self.match_token(TokenKind::Semicolon) {
            self.emit_return();
        } else {
            self.expression();
            self.consume(TokenKind::Semicolon, "Expected ';' after return value.");
            self.emit_op(OpCode::Return);
        }
    }

    fn if_statement(&mut self) {
        self.consume(TokenKind::LeftParen, "Expected '(' after 'if'.");
        self.expression();
        self.consume(TokenKind::RightParen, "Expected ')' after condition.");

        let then_jump = self.emit_jump(OpCode::JumpIfFalse);
        self.emit_op(OpCode::Pop);
        self.statement();
        let else_jump = self.emit_jump(OpCode::Jump);

        self.patch_jump(then_jump);
        self.emit_op(OpCode::Pop);
        if self.match_token(TokenKind::Else) {
            self.statement();
        }
        self.patch_jump(else_jump);
    }

    fn while_statement(&mut self) {
        let loop_start = self.current_chunk().code.len();

        self.consume(TokenKind::LeftParen, "Expected '(' after 'while'.");
        self.expression();
        self.consume(TokenKind::RightParen, "Expected ')' after condition.");

        let exit_jump = self.emit_jump(OpCode::JumpIfFalse);
        self.emit_op(OpCode::Pop);
        self.statement();
        self.emit_loop(loop_start);

        self.patch_jump(exit_jump);
        self.emit_op(OpCode::Pop);
    }

    /// `for ( init ; cond ; step ) body`, desugared with one backward
    /// jump per edge: body → step, step → condition.
    fn for_statement(&mut self) {
        self.begin_scope();
        self.consume(TokenKind::LeftParen, "Expected '(' after 'for'.");

        if self.match_token(TokenKind::Semicolon) {
            // No initializer.
        } else if self.match_token(TokenKind::Let) {
            self.var_declaration();
        } else {
            self.expression_statement();
        }

        let mut loop_start = self.current_chunk().code.len();
        let mut exit_jump = None;
        if !self.match_token(TokenKind::Semicolon) {
            self.expression();
            self.consume(TokenKind::Semicolon, "Expected ';' after loop condition.");

            exit_jump = Some(self.emit_jump(OpCode::JumpIfFalse));
            self.emit_op(OpCode::Pop);
        }

        if !self.match_token(TokenKind::RightParen) {
            // The step textually precedes the body but runs after it:
            // jump over the step, and point the body's back-edge at it.
            let body_jump = self.emit_jump(OpCode::Jump);
            let step_start = self.current_chunk().code.len();
            self.expression();
            self.emit_op(OpCode::Pop);
            self.consume(TokenKind::RightParen, "Expected ')' after for clauses.");

            self.emit_loop(loop_start);
            loop_start = step_start;
            self.patch_jump(body_jump);
        }

        self.statement();
        self.emit_loop(loop_start);

        if let Some(exit_jump) = exit_jump {
            self.patch_jump(exit_jump);
            self.emit_op(OpCode::Pop);
        }
        self.end_scope();
    }

    /// `{ declarations }`
    pub(crate) fn block(&mut self) {
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            self.declaration();
        }
        self.consume(TokenKind::RightBrace, "Expected '}' after block.");
    }

    fn expression_statement(&mut self) {
        self.expression();
        self.consume(TokenKind::Semicolon, "Expected ';' after expression.");
        self.emit_op(OpCode::Pop);
    }
}
