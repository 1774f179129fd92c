//! Expression compilation: Pratt parsing (top-down operator precedence).
//!
//! # Operator precedence (lowest to highest)
//!
//! | Level      | Operators            | Associativity |
//! |------------|----------------------|---------------|
//! | Assignment | `=`                  | Right         |
//! | Or         | `or`                 | Left          |
//! | And        | `and`                | Left          |
//! | Equality   | `==`, `!=`           | Left          |
//! | Comparison | `<`, `<=`, `>`, `>=` | Left          |
//! | Term       | `+`, `-`             | Left          |
//! | Factor     | `*`, `/`             | Left          |
//! | Unary      | `!`, `-`             | Right         |
//! | Call       | `f(...)`             | Left          |
//!
//! Each token kind owns one row of the rule table: an optional prefix
//! handler (the token starts an expression), an optional infix handler
//! (the token continues one), and the precedence its infix form binds at.
//! `parse_precedence` drives the handlers; the handlers emit bytecode
//! directly, so compiling an expression leaves exactly one value on the
//! VM stack at runtime.

use rill_lex::TokenKind;
use rill_runtime::{OpCode, Value};

use crate::parser::Parser;

/// Infix binding levels, weakest first. `next()` gives the level used
/// for a left-associative operator's right operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Precedence {
    None,
    Assignment,
    Or,
    And,
    Equality,
    Comparison,
    Term,
    Factor,
    Unary,
    Call,
    Primary,
}

impl Precedence {
    fn next(self) -> Self {
        match self {
            Precedence::None => Precedence::Assignment,
            Precedence::Assignment => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Unary,
            Precedence::Unary => Precedence::Call,
            Precedence::Call | Precedence::Primary => Precedence::Primary,
        }
    }
}

type ParseFn<'src, 'ctx> = fn(&mut Parser<'src, 'ctx>, bool);

/// One row of the Pratt table.
pub(crate) struct ParseRule<'src, 'ctx> {
    prefix: Option<ParseFn<'src, 'ctx>>,
    infix: Option<ParseFn<'src, 'ctx>>,
    precedence: Precedence,
}

/// The token → handler mapping. Token kinds without a row (keywords that
/// head statements, reserved words, punctuation) parse as neither prefix
/// nor infix and fall out as "Expected expression." when one is needed.
fn rule<'src, 'ctx>(kind: TokenKind) -> ParseRule<'src, 'ctx> {
    use TokenKind::*;

    let (prefix, infix, precedence): (
        Option<ParseFn<'src, 'ctx>>,
        Option<ParseFn<'src, 'ctx>>,
        Precedence,
    ) = match kind {
        LeftParen => (Some(Parser::grouping), Some(Parser::call), Precedence::Call),
        Minus => (Some(Parser::unary), Some(Parser::binary), Precedence::Term),
        Plus => (None, Some(Parser::binary), Precedence::Term),
        Slash | Star => (None, Some(Parser::binary), Precedence::Factor),
        Bang => (Some(Parser::unary), None, Precedence::None),
        BangEqual | EqualEqual => (None, Some(Parser::binary), Precedence::Equality),
        Greater | GreaterEqual | Less | LessEqual => {
            (None, Some(Parser::binary), Precedence::Comparison)
        }
        Identifier => (Some(Parser::variable), None, Precedence::None),
        String => (Some(Parser::string), None, Precedence::None),
        Number => (Some(Parser::number), None, Precedence::None),
        And => (None, Some(Parser::and_), Precedence::And),
        Or => (None, Some(Parser::or_), Precedence::Or),
        True | False | Null => (Some(Parser::literal), None, Precedence::None),
        _ => (None, None, Precedence::None),
    };
    ParseRule {
        prefix,
        infix,
        precedence,
    }
}

impl<'src, 'ctx> Parser<'src, 'ctx> {
    /// Compiles one full expression.
    pub(crate) fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }

    /// The Pratt core: parse a prefix expression, then fold in infix
    /// operators while their precedence is at least `precedence`.
    pub(crate) fn parse_precedence(&mut self, precedence: Precedence) {
        self.advance();
        let Some(prefix) = rule(self.previous.kind).prefix else {
            self.error("Expected expression.");
            return;
        };

        // Assignment may only be consumed by the lowest-precedence
        // context; a handler reached from deeper in an expression must
        // leave `=` alone so the check below can reject it.
        let can_assign = precedence <= Precedence::Assignment;
        prefix(self, can_assign);

        while precedence <= rule(self.current.kind).precedence {
            self.advance();
            if let Some(infix) = rule(self.previous.kind).infix {
                infix(self, can_assign);
            }
        }

        if can_assign && self.match_token(TokenKind::Equal) {
            self.error("Invalid assignment.");
        }
    }

    /// Number literal prefix.
    fn number(&mut self, _can_assign: bool) {
        match self.previous.lexeme.parse::<f64>() {
            Ok(value) => self.emit_constant(Value::Number(value)),
            Err(_) => self.error("Invalid number literal."),
        }
    }

    /// String literal prefix; strips the quotes and interns.
    fn string(&mut self, _can_assign: bool) {
        let lexeme = self.previous.lexeme;
        let chars = &lexeme[1..lexeme.len() - 1];
        let handle = self.heap.intern(chars);
        self.emit_constant(Value::Obj(handle));
    }

    /// `true` / `false` / `null` prefix.
    fn literal(&mut self, _can_assign: bool) {
        match self.previous.kind {
            TokenKind::True => self.emit_op(OpCode::True),
            TokenKind::False => self.emit_op(OpCode::False),
            TokenKind::Null => self.emit_op(OpCode::Null),
            _ => unreachable!("literal handler on non-literal token"),
        }
    }

    /// Parenthesized expression prefix.
    fn grouping(&mut self, _can_assign: bool) {
        self.expression();
        self.consume(TokenKind::RightParen, "Expected ')' after expression.");
    }

    /// `-x` and `!x` prefix.
    fn unary(&mut self, _can_assign: bool) {
        let operator = self.previous.kind;

        self.parse_precedence(Precedence::Unary);

        match operator {
            TokenKind::Minus => self.emit_op(OpCode::Negate),
            TokenKind::Bang => self.emit_op(OpCode::Not),
            _ => unreachable!("unary handler on non-unary token"),
        }
    }

    /// Left-associative binary operators; the right operand binds one
    /// level tighter.
    fn binary(&mut self, _can_assign: bool) {
        let operator = self.previous.kind;
        let next = rule(operator).precedence.next();
        self.parse_precedence(next);

        match operator {
            TokenKind::BangEqual => self.emit_ops(OpCode::Equal, OpCode::Not),
            TokenKind::EqualEqual => self.emit_op(OpCode::Equal),
            TokenKind::Greater => self.emit_op(OpCode::Greater),
            TokenKind::GreaterEqual => self.emit_ops(OpCode::Less, OpCode::Not),
            TokenKind::Less => self.emit_op(OpCode::Less),
            TokenKind::LessEqual => self.emit_ops(OpCode::Greater, OpCode::Not),
            TokenKind::Plus => self.emit_op(OpCode::Add),
            TokenKind::Minus => self.emit_op(OpCode::Subtract),
            TokenKind::Star => self.emit_op(OpCode::Multiply),
            TokenKind::Slash => self.emit_op(OpCode::Divide),
            _ => unreachable!("binary handler on non-binary token"),
        }
    }

    /// `and` short-circuits over the right operand; the left value is
    /// popped only when evaluation continues.
    fn and_(&mut self, _can_assign: bool) {
        let end_jump = self.emit_jump(OpCode::JumpIfFalse);

        self.emit_op(OpCode::Pop);
        self.parse_precedence(Precedence::And);

        self.patch_jump(end_jump);
    }

    /// `or` jumps over the right operand when the left is truthy.
    fn or_(&mut self, _can_assign: bool) {
        let else_jump = self.emit_jump(OpCode::JumpIfFalse);
        let end_jump = self.emit_jump(OpCode::Jump);

        self.patch_jump(else_jump);
        self.emit_op(OpCode::Pop);

        self.parse_precedence(Precedence::Or);
        self.patch_jump(end_jump);
    }

    /// Call infix: the callee is already on the stack.
    fn call(&mut self, _can_assign: bool) {
        let argc = self.argument_list();
        self.emit_op_byte(OpCode::Call, argc);
    }

    fn argument_list(&mut self) -> u8 {
        let mut argc: u8 = 0;
        if !self.check(TokenKind::RightParen) {
            loop {
                self.expression();
                if argc == u8::MAX {
                    self.error("Can't have more than 255 arguments.");
                } else {
                    argc += 1;
                }
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expected ')' after arguments.");
        argc
    }

    /// Identifier prefix: local slot if resolvable, else global by name.
    /// With `can_assign`, a following `=` compiles as assignment.
    fn variable(&mut self, can_assign: bool) {
        let (get_op, set_op, operand) = match self.resolve_local() {
            Some(slot) => (OpCode::GetLocal, OpCode::SetLocal, slot),
            None => {
                let index = self.identifier_constant();
                (OpCode::GetGlobal, OpCode::SetGlobal, index)
            }
        };

        if can_assign && self.match_token(TokenKind::Equal) {
            self.expression();
            self.emit_op_byte(set_op, operand);
        } else {
            self.emit_op_byte(get_op, operand);
        }
    }
}
