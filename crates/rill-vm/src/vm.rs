//! The virtual machine: operand stack, call frames, dispatch loop.

use std::io::{self, Write};

use tracing::trace;

use rill_compile::compile;
use rill_runtime::debug::disassemble_instruction;
use rill_runtime::{Heap, NativeFn, Obj, ObjRef, OpCode, Table, Value};
use rill_util::Handler;

use crate::error::{InterpretError, RuntimeError};
use crate::natives;

/// Maximum call depth, including the top-level script frame.
pub const FRAMES_MAX: usize = 64;

/// Maximum operand-stack depth: 256 slots per possible frame.
pub const STACK_MAX: usize = FRAMES_MAX * 256;

/// One function activation: which function, where in its code, and where
/// its slot window starts on the shared stack.
struct CallFrame {
    function: ObjRef,
    ip: usize,
    base: usize,
}

/// What a callee turned out to be, copied out of the heap before the
/// stack is touched.
enum Callee {
    Function { handle: ObjRef, arity: u8 },
    Native(NativeFn),
    NotCallable,
}

/// The interpreter. Owns the heap, globals, and output sink; one instance
/// serves a whole session.
pub struct Vm {
    heap: Heap,
    stack: Vec<Value>,
    frames: Vec<CallFrame>,
    globals: Table,
    out: Box<dyn Write>,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    /// A VM printing to stdout.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// A VM printing to the given sink; tests pass a shared buffer.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        let mut vm = Self {
            heap: Heap::new(),
            stack: Vec::with_capacity(STACK_MAX),
            frames: Vec::with_capacity(FRAMES_MAX),
            globals: Table::new(),
            out,
        };
        vm.define_native("clock", natives::clock);
        vm
    }

    fn define_native(&mut self, name: &str, function: NativeFn) {
        let native = self.heap.alloc_native(name, function);
        let name = self.heap.intern(name);
        self.globals
            .set(self.heap.objects(), name, Value::Obj(native));
    }

    /// Compiles and runs one source string against this VM's state.
    ///
    /// Globals and interned strings survive between calls, so a REPL can
    /// feed lines one at a time.
    pub fn interpret(&mut self, source: &str) -> Result<(), InterpretError> {
        let mut handler = Handler::new();
        let script = compile(source, &mut self.heap, &mut handler)?;

        self.stack.clear();
        self.frames.clear();
        self.push(Value::Obj(script))?;
        self.call_value(0)?;

        self.run().map_err(InterpretError::Runtime)
    }

    // ------------------------------------------------------------------
    // Dispatch loop
    // ------------------------------------------------------------------

    fn run(&mut self) -> Result<(), RuntimeError> {
        loop {
            if tracing::event_enabled!(tracing::Level::TRACE) {
                self.trace_instruction();
            }

            let byte = self.read_byte();
            let op = match OpCode::try_from(byte) {
                Ok(op) => op,
                Err(_) => unreachable!("compiler emitted invalid opcode {byte}"),
            };

            match op {
                OpCode::Constant => {
                    let value = self.read_constant();
                    self.push(value)?;
                }
                OpCode::Null => self.push(Value::Null)?,
                OpCode::True => self.push(Value::Bool(true))?,
                OpCode::False => self.push(Value::Bool(false))?,
                OpCode::Pop => {
                    self.pop();
                }
                OpCode::GetLocal => {
                    let slot = self.read_byte() as usize;
                    let value = self.stack[self.frame().base + slot];
                    self.push(value)?;
                }
                OpCode::SetLocal => {
                    // Assignment is an expression; the value stays put.
                    let slot = self.read_byte() as usize;
                    let base = self.frame().base;
                    self.stack[base + slot] = self.peek(0);
                }
                OpCode::GetGlobal => {
                    let name = self.read_name();
                    match self.globals.get(self.heap.objects(), name) {
                        Some(value) => self.push(value)?,
                        None => return Err(self.undefined_variable(name)),
                    }
                }
                OpCode::DefineGlobal => {
                    let name = self.read_name();
                    let value = self.peek(0);
                    self.globals.set(self.heap.objects(), name, value);
                    self.pop();
                }
                OpCode::SetGlobal => {
                    // Assignment never creates a global; `let` does.
                    let name = self.read_name();
                    if self.globals.get(self.heap.objects(), name).is_none() {
                        return Err(self.undefined_variable(name));
                    }
                    let value = self.peek(0);
                    self.globals.set(self.heap.objects(), name, value);
                }
                OpCode::Equal => {
                    let b = self.pop();
                    let a = self.pop();
                    self.push(Value::Bool(a == b))?;
                }
                OpCode::Greater => self.numeric_binary(|a, b| Value::Bool(a > b))?,
                OpCode::Less => self.numeric_binary(|a, b| Value::Bool(a < b))?,
                OpCode::Add => self.add()?,
                OpCode::Subtract => self.numeric_binary(|a, b| Value::Number(a - b))?,
                OpCode::Multiply => self.numeric_binary(|a, b| Value::Number(a * b))?,
                OpCode::Divide => self.numeric_binary(|a, b| Value::Number(a / b))?,
                OpCode::Not => {
                    let value = self.pop();
                    self.push(Value::Bool(value.is_falsey()))?;
                }
                OpCode::Negate => {
                    let Some(n) = self.peek(0).as_number() else {
                        return Err(self.runtime_error("Operand must be a number."));
                    };
                    self.pop();
                    self.push(Value::Number(-n))?;
                }
                OpCode::Print => {
                    let value = self.pop();
                    let text = value.display(&self.heap).to_string();
                    if writeln!(self.out, "{text}").is_err() {
                        // Output sink gone (closed pipe); stop quietly.
                        return Ok(());
                    }
                }
                OpCode::Jump => {
                    let distance = self.read_u16() as usize;
                    self.frame_mut().ip += distance;
                }
                OpCode::JumpIfFalse => {
                    // Leaves the condition on the stack; the compiler
                    // emits the pops on both edges.
                    let distance = self.read_u16() as usize;
                    if self.peek(0).is_falsey() {
                        self.frame_mut().ip += distance;
                    }
                }
                OpCode::Loop => {
                    let distance = self.read_u16() as usize;
                    self.frame_mut().ip -= distance;
                }
                OpCode::Call => {
                    let argc = self.read_byte();
                    self.call_value(argc)?;
                }
                OpCode::Return => {
                    let result = self.pop();
                    let frame = match self.frames.pop() {
                        Some(frame) => frame,
                        None => unreachable!("return with no active frame"),
                    };
                    if self.frames.is_empty() {
                        // Pop the script function itself and finish.
                        self.pop();
                        return Ok(());
                    }
                    self.stack.truncate(frame.base);
                    self.push(result)?;
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Frame and code access
    // ------------------------------------------------------------------

    fn frame(&self) -> &CallFrame {
        &self.frames[self.frames.len() - 1]
    }

    fn frame_mut(&mut self) -> &mut CallFrame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn read_byte(&mut self) -> u8 {
        let last = self.frames.len() - 1;
        let frame = &mut self.frames[last];
        let byte = self.heap.function(frame.function).chunk.code[frame.ip];
        frame.ip += 1;
        byte
    }

    fn read_u16(&mut self) -> u16 {
        let high = self.read_byte();
        let low = self.read_byte();
        u16::from_be_bytes([high, low])
    }

    fn read_constant(&mut self) -> Value {
        let index = self.read_byte() as usize;
        let frame = self.frame();
        self.heap.function(frame.function).chunk.constants[index]
    }

    /// Reads a constant known to be an interned name.
    fn read_name(&mut self) -> ObjRef {
        match self.read_constant() {
            Value::Obj(r) => r,
            other => unreachable!("name constant is not a string: {other:?}"),
        }
    }

    // ------------------------------------------------------------------
    // Stack
    // ------------------------------------------------------------------

    fn push(&mut self, value: Value) -> Result<(), RuntimeError> {
        if self.stack.len() == STACK_MAX {
            return Err(self.runtime_error("Stack overflow."));
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Value {
        match self.stack.pop() {
            Some(value) => value,
            None => unreachable!("operand stack underflow"),
        }
    }

    fn peek(&self, distance: usize) -> Value {
        self.stack[self.stack.len() - 1 - distance]
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// The shared shape of the numeric binary operators: both operands
    /// are checked before either is popped.
    fn numeric_binary(&mut self, apply: fn(f64, f64) -> Value) -> Result<(), RuntimeError> {
        let (Some(a), Some(b)) = (self.peek(1).as_number(), self.peek(0).as_number()) else {
            return Err(self.runtime_error("Operands must be numbers."));
        };
        self.pop();
        self.pop();
        self.push(apply(a, b))
    }

    /// `+` concatenates two strings (interning the result) or adds two
    /// numbers; anything else is a type error.
    fn add(&mut self) -> Result<(), RuntimeError> {
        let b = self.peek(0);
        let a = self.peek(1);

        if a.is_string(&self.heap) && b.is_string(&self.heap) {
            let mut chars = String::new();
            if let (Value::Obj(a), Value::Obj(b)) = (a, b) {
                chars.push_str(&self.heap.string(a).chars);
                chars.push_str(&self.heap.string(b).chars);
            }
            let result = self.heap.intern_owned(chars);
            self.pop();
            self.pop();
            return self.push(Value::Obj(result));
        }

        if let (Some(a), Some(b)) = (a.as_number(), b.as_number()) {
            self.pop();
            self.pop();
            return self.push(Value::Number(a + b));
        }

        Err(self.runtime_error("Operands must be two strings or two numbers."))
    }

    /// Resolves the value at `peek(argc)` as a callee and either pushes a
    /// frame (functions) or runs it on the spot (natives).
    fn call_value(&mut self, argc: u8) -> Result<(), RuntimeError> {
        let callee = match self.peek(argc as usize).as_obj() {
            Some(r) => match self.heap.get(r) {
                Obj::Fun(f) => Callee::Function {
                    handle: r,
                    arity: f.arity,
                },
                Obj::Native(n) => Callee::Native(n.function),
                Obj::Str(_) => Callee::NotCallable,
            },
            None => Callee::NotCallable,
        };

        match callee {
            Callee::Function { handle, arity } => {
                if argc != arity {
                    let message = format!("Expected {arity} arguments but got {argc}.");
                    return Err(self.runtime_error(&message));
                }
                if self.frames.len() == FRAMES_MAX {
                    return Err(self.runtime_error("Stack overflow."));
                }
                self.frames.push(CallFrame {
                    function: handle,
                    ip: 0,
                    // The callee sits just below its arguments and owns
                    // frame slot 0.
                    base: self.stack.len() - argc as usize - 1,
                });
                Ok(())
            }
            Callee::Native(function) => {
                let first_arg = self.stack.len() - argc as usize;
                let result = function(&self.stack[first_arg..]);
                // Arguments and callee leave in one shot.
                self.stack.truncate(first_arg - 1);
                self.push(result)
            }
            Callee::NotCallable => Err(self.runtime_error("Can only call functions.")),
        }
    }

    // ------------------------------------------------------------------
    // Errors and tracing
    // ------------------------------------------------------------------

    fn undefined_variable(&mut self, name: ObjRef) -> RuntimeError {
        let message = format!("Undefined variable '{}'.", self.heap.string(name).chars);
        self.runtime_error(&message)
    }

    /// Prints the message and a stack trace to stderr, resets the VM, and
    /// builds the error value `run` surfaces.
    fn runtime_error(&mut self, message: &str) -> RuntimeError {
        eprintln!("{message}");

        for frame in self.frames.iter().rev() {
            let function = self.heap.function(frame.function);
            // ip already advanced past the failing instruction.
            let line = function.chunk.lines[frame.ip.saturating_sub(1)];
            match function.name {
                Some(name) => {
                    eprintln!("[line {}] in {}()", line, self.heap.string(name).chars);
                }
                None => eprintln!("[line {}] in script", line),
            }
        }

        self.stack.clear();
        self.frames.clear();
        RuntimeError {
            message: message.to_string(),
        }
    }

    fn trace_instruction(&self) {
        let frame = self.frame();
        let chunk = &self.heap.function(frame.function).chunk;
        let (line, _) = disassemble_instruction(chunk, frame.ip, &self.heap);
        trace!(depth = self.stack.len(), "{line}");
    }
}
