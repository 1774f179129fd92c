//! rill-vm - Stack-Based Virtual Machine
//!
//! ============================================================================
//! EXECUTION MODEL
//! ============================================================================
//!
//! The VM executes chunks against one shared operand stack. Function calls
//! do not copy arguments anywhere: a call frame is a window into the stack,
//! and the callee's local slots are the caller's argument slots.
//!
//! ```text
//! stack:  [ <script> | f | arg0 | arg1 | temp ... ]
//!                      ▲
//!                      └── frame.base: slot 0 of f's frame is f itself,
//!                          arg0 is slot 1, arg1 is slot 2, ...
//! ```
//!
//! DISPATCH:
//! ---------
//! `run` reads one opcode byte at the current frame's instruction pointer,
//! advances it, and executes. Jumps adjust the ip by big-endian 16-bit
//! distances; `Call` pushes a frame; `Return` pops one, shrinks the stack
//! to the frame base, and pushes the result. When the last frame returns,
//! execution ends.
//!
//! BOUNDS:
//! -------
//! 64 call frames and 64 × 256 operand-stack slots, both enforced at
//! runtime with a "Stack overflow." error. Exceeding neither is possible
//! from straight-line code; deep recursion hits the frame bound first.
//!
//! ERRORS:
//! -------
//! Runtime errors (type mismatches, undefined globals, bad calls, arity
//! mismatches, overflow) print the message and a stack trace to stderr
//! (innermost frame first, `[line N] in name()` per frame), then reset the
//! VM and surface as [`RuntimeError`]. Compile errors pass through as
//! [`InterpretError::Compile`]; the driver maps the two variants to
//! distinct exit codes.
//!
//! The VM owns the heap, the globals table, and the output sink `print`
//! writes to. One VM lives for a whole REPL session, which is what makes
//! globals persist across lines.

mod error;
mod natives;
mod vm;

pub use error::{InterpretError, RuntimeError};
pub use vm::{Vm, FRAMES_MAX, STACK_MAX};
