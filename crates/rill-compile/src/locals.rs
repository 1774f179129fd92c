//! Function compilation state: locals, scopes, and the compiler stack.
//!
//! Each function body compiles under its own [`FunCompiler`]; nested
//! `fn` declarations push a fresh state and pop back to the enclosing one
//! when the body ends. The chain is owned (`Option<Box<..>>`), not a
//! global, so nesting needs no hidden mutable state.

use rill_lex::TokenKind;
use rill_runtime::{FunObj, ObjRef, OpCode};

use crate::parser::Parser;

/// Hard limit on local slots per function; one operand byte addresses
/// them, and slot 0 is reserved for the callee value.
pub(crate) const MAX_LOCALS: usize = 256;

/// What kind of function body is being compiled. `return` at the top
/// level is rejected based on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FunctionKind {
    Script,
    Function,
}

/// One declared local variable.
///
/// `depth` is `None` between declaration and the end of the initializer;
/// reading the variable in that window is a compile error, which is what
/// makes `let a = a;` fail instead of silently capturing an outer `a`.
pub(crate) struct Local<'src> {
    name: &'src str,
    depth: Option<usize>,
}

/// Per-function compilation state.
pub(crate) struct FunCompiler<'src> {
    pub(crate) enclosing: Option<Box<FunCompiler<'src>>>,
    pub(crate) function: FunObj,
    pub(crate) kind: FunctionKind,
    locals: Vec<Local<'src>>,
    scope_depth: usize,
}

impl<'src> FunCompiler<'src> {
    pub(crate) fn new(kind: FunctionKind, name: Option<ObjRef>) -> Self {
        let function = match name {
            Some(name) => FunObj::named(name),
            None => FunObj::script(),
        };
        // Slot 0 belongs to the callee value the VM parks at the frame
        // base; an empty name keeps it unresolvable.
        let mut locals = Vec::with_capacity(8);
        locals.push(Local {
            name: "",
            depth: Some(0),
        });
        Self {
            enclosing: None,
            function,
            kind,
            locals,
            scope_depth: 0,
        }
    }

    pub(crate) fn take_function(&mut self) -> FunObj {
        std::mem::replace(&mut self.function, FunObj::script())
    }
}

impl<'src, 'ctx> Parser<'src, 'ctx> {
    pub(crate) fn begin_scope(&mut self) {
        self.compiler.scope_depth += 1;
    }

    /// Closes the innermost scope, popping its locals off both the slot
    /// array and the runtime stack.
    pub(crate) fn end_scope(&mut self) {
        self.compiler.scope_depth -= 1;
        while self
            .compiler
            .locals
            .last()
            .is_some_and(|local| local.depth.is_some_and(|d| d > self.compiler.scope_depth))
        {
            self.emit_op(OpCode::Pop);
            self.compiler.locals.pop();
        }
    }

    /// Parses a variable name. Locals get a reserved slot and resolve by
    /// index; globals resolve by name, which goes into the constant pool,
    /// and the returned index addresses it.
    pub(crate) fn parse_variable(&mut self, message: &str) -> u8 {
        self.consume(TokenKind::Identifier, message);

        self.declare_variable();
        if self.compiler.scope_depth > 0 {
            return 0;
        }

        self.identifier_constant()
    }

    /// Interns the name in `previous` and adds it to the constant pool.
    pub(crate) fn identifier_constant(&mut self) -> u8 {
        let name = self.heap.intern(self.previous.lexeme);
        self.make_constant(rill_runtime::Value::Obj(name))
    }

    /// Declares a local in the current scope. No-op for globals.
    fn declare_variable(&mut self) {
        if self.compiler.scope_depth == 0 {
            return;
        }
        let name = self.previous.lexeme;

        let mut collision = false;
        for local in self.compiler.locals.iter().rev() {
            if local.depth.is_some_and(|d| d < self.compiler.scope_depth) {
                break;
            }
            if local.name == name {
                collision = true;
                break;
            }
        }
        if collision {
            self.error("Redeclaration of local variable.");
        }
        self.add_local(name);
    }

    fn add_local(&mut self, name: &'src str) {
        if self.compiler.locals.len() == MAX_LOCALS {
            self.error("Too many local variables in function.");
            return;
        }
        self.compiler.locals.push(Local { name, depth: None });
    }

    /// Makes the just-declared local visible. No-op for globals.
    pub(crate) fn mark_initialized(&mut self) {
        if self.compiler.scope_depth == 0 {
            return;
        }
        let depth = self.compiler.scope_depth;
        if let Some(local) = self.compiler.locals.last_mut() {
            local.depth = Some(depth);
        }
    }

    /// Emits the definition of the variable slot `parse_variable` set up.
    pub(crate) fn define_variable(&mut self, global: u8) {
        if self.compiler.scope_depth > 0 {
            self.mark_initialized();
            return;
        }
        self.emit_op_byte(OpCode::DefineGlobal, global);
    }

    /// Resolves `previous` against the current function's locals, top
    /// slot first. `None` means the name is not a local here (so it is a
    /// global reference).
    pub(crate) fn resolve_local(&mut self) -> Option<u8> {
        let name = self.previous.lexeme;
        let mut resolved = None;
        for (slot, local) in self.compiler.locals.iter().enumerate().rev() {
            if local.name == name {
                resolved = Some((slot as u8, local.depth.is_none()));
                break;
            }
        }
        let (slot, uninitialized) = resolved?;
        if uninitialized {
            self.error("Can't read local variable in its own initializer.");
        }
        Some(slot)
    }
}
