//! rill-compile - Single-Pass Bytecode Compiler
//!
//! ============================================================================
//! COMPILATION MODEL
//! ============================================================================
//!
//! There is no AST. The compiler is a recursive-descent statement parser
//! fused with a Pratt expression parser, and both emit bytecode into the
//! current function's chunk as they consume tokens. One pass, one token of
//! lookahead, left to right.
//!
//! ```text
//! Source ──▶ [Scanner] ──▶ tokens ──▶ [Parser + emitters] ──▶ FunObj
//!                                         │
//!                                         ▼
//!                                  strings/functions
//!                                  allocated in the Heap
//! ```
//!
//! PRATT DISPATCH:
//! ---------------
//! Every token kind maps to an optional prefix handler, an optional infix
//! handler, and an infix precedence (the `rule` table in `expr`).
//! `parse_precedence(p)` consumes one token, runs its prefix handler, then
//! keeps consuming infix operators while their precedence is at least `p`.
//! Assignability threads through as a flag: only when the caller's
//! precedence admits assignment may the variable handler consume an `=`.
//!
//! SCOPES AND LOCALS:
//! ------------------
//! Function compilation is a stack of `FunCompiler` states (the `locals`
//! module): each holds the function being built, its local slots, and the
//! lexical depth. Slot 0 of every function is reserved for the callee
//! value itself, so locals and the VM's frame layout agree by
//! construction. Globals resolve by name at runtime instead; their names
//! go into the constant pool.
//!
//! ERROR RECOVERY:
//! ---------------
//! The first error at a site switches the parser into panic mode, which
//! suppresses further diagnostics until `synchronize` skips to a
//! statement boundary. Every diagnostic goes through the `rill-util`
//! handler as it happens; if any error was reported, [`compile`] returns
//! [`CompileError`] and no function object.

mod emit;
mod expr;
mod locals;
mod parser;
mod stmt;

use thiserror::Error;
use tracing::debug;

use rill_lex::TokenKind;
use rill_runtime::{Heap, ObjRef};
use rill_util::Handler;

use parser::Parser;

/// Compilation failed; the individual diagnostics already went through
/// the handler.
#[derive(Debug, Error)]
#[error("compilation failed with {count} error(s)")]
pub struct CompileError {
    /// Number of error diagnostics reported.
    pub count: usize,
}

/// Compiles a source string into a top-level function object.
///
/// Strings and nested functions the program mentions are allocated in
/// `heap` as compilation goes; diagnostics stream through `handler`. On
/// success the returned handle is the `<script>` function whose chunk
/// holds the whole program, finalized with an implicit `null` return.
pub fn compile(
    source: &str,
    heap: &mut Heap,
    handler: &mut Handler,
) -> Result<ObjRef, CompileError> {
    debug!(bytes = source.len(), "compiling source");

    let mut parser = Parser::new(source, heap, handler);
    parser.advance();
    while !parser.match_token(TokenKind::Eof) {
        parser.declaration();
    }
    let function = parser.finish();

    if handler.has_errors() {
        debug!(errors = handler.error_count(), "compilation failed");
        return Err(CompileError {
            count: handler.error_count(),
        });
    }
    debug!("compilation finished");
    Ok(heap.alloc_function(function))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_runtime::OpCode;

    fn compile_ok(source: &str) -> (Heap, ObjRef) {
        let mut heap = Heap::new();
        let mut handler = Handler::silent();
        let function = compile(source, &mut heap, &mut handler)
            .unwrap_or_else(|_| panic!("unexpected compile errors: {:?}", handler.diagnostics()));
        (heap, function)
    }

    fn compile_err(source: &str) -> (Heap, Handler) {
        let mut heap = Heap::new();
        let mut handler = Handler::silent();
        assert!(compile(source, &mut heap, &mut handler).is_err());
        (heap, handler)
    }

    fn ops(heap: &Heap, function: ObjRef) -> Vec<OpCode> {
        // Decode only opcode bytes, skipping operands.
        let chunk = &heap.function(function).chunk;
        let mut ops = Vec::new();
        let mut offset = 0;
        while offset < chunk.code.len() {
            let op = OpCode::try_from(chunk.code[offset]).expect("valid opcode");
            ops.push(op);
            offset += 1 + match op {
                OpCode::Constant
                | OpCode::GetGlobal
                | OpCode::DefineGlobal
                | OpCode::SetGlobal
                | OpCode::GetLocal
                | OpCode::SetLocal
                | OpCode::Call => 1,
                OpCode::Jump | OpCode::JumpIfFalse | OpCode::Loop => 2,
                _ => 0,
            };
        }
        ops
    }

    #[test]
    fn test_empty_program_is_null_return() {
        let (heap, function) = compile_ok("");
        assert_eq!(ops(&heap, function), vec![OpCode::Null, OpCode::Return]);
    }

    #[test]
    fn test_expression_statement_pops() {
        let (heap, function) = compile_ok("1 + 2;");
        assert_eq!(
            ops(&heap, function),
            vec![
                OpCode::Constant,
                OpCode::Constant,
                OpCode::Add,
                OpCode::Pop,
                OpCode::Null,
                OpCode::Return,
            ]
        );
    }

    #[test]
    fn test_print_statement() {
        let (heap, function) = compile_ok("print 1;");
        assert_eq!(
            ops(&heap, function),
            vec![
                OpCode::Constant,
                OpCode::Print,
                OpCode::Null,
                OpCode::Return
            ]
        );
    }

    #[test]
    fn test_script_function_has_no_name() {
        let (heap, function) = compile_ok("print 1;");
        assert!(heap.function(function).name.is_none());
        assert_eq!(heap.function(function).arity, 0);
    }

    #[test]
    fn test_line_table_matches_code_length() {
        let (heap, function) = compile_ok("print\n1\n;\nprint 2;");
        let chunk = &heap.function(function).chunk;
        assert_eq!(chunk.code.len(), chunk.lines.len());
        assert!(chunk.lines.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_error_reports_and_fails() {
        let (_, handler) = compile_err("print ;");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message == "Expected expression."));
    }

    #[test]
    fn test_scanner_error_token_becomes_diagnostic() {
        let (_, handler) = compile_err("let x = \"unclosed;");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message == "Unterminated string."));
    }

    #[test]
    fn test_panic_mode_reports_once_per_statement() {
        // Both statements are broken; panic mode suppresses the cascade
        // inside each, synchronize re-arms at the `;`.
        let (_, handler) = compile_err("let 1 = 2; print ;");
        assert_eq!(handler.error_count(), 2);
    }

    #[test]
    fn test_two_hundred_fifty_six_constants_compile() {
        let source: String = (0..256).map(|i| format!("print {i};")).collect();
        compile_ok(&source);
    }

    #[test]
    fn test_two_hundred_fifty_seven_constants_error() {
        let source: String = (0..257).map(|i| format!("print {i};")).collect();
        let (_, handler) = compile_err(&source);
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message == "Too many constants in one chunk."));
    }
}
