//! rill-runtime - Values, Objects, Bytecode, and the Hash Table
//!
//! ============================================================================
//! RUNTIME DATA MODEL OVERVIEW
//! ============================================================================
//!
//! This crate holds everything the compiler and the VM share: the value
//! representation, the object heap, the bytecode container, and the
//! open-addressing table used for both string interning and global
//! variables.
//!
//! VALUES AND OBJECTS:
//! -------------------
//! A [`Value`] is a small tagged union: booleans, null, f64 numbers, and
//! object references. Objects (strings, functions, natives) live in a
//! [`Heap`] arena owned by the VM; a [`ObjRef`] is a u32 handle into it.
//!
//! ```text
//! Value (16 bytes):          Heap:
//! ┌────────┬──────────┐      ┌──────────────────────────────┐
//! │  tag   │ payload  │      │ 0: Str "print"               │
//! │        │ f64/bool │      │ 1: Str "foobar"              │
//! │        │ ObjRef ──┼────▶ │ 2: Fun <script>              │
//! └────────┴──────────┘      │ 3: Native <native fn>        │
//!                            └──────────────────────────────┘
//! ```
//!
//! Handles keep `Value` `Copy` and make object identity a u32 comparison.
//! Every string is interned: creating a string whose bytes already exist
//! in the heap returns the canonical handle, so string equality IS handle
//! equality. Object lifetime is "until the heap is dropped": the language
//! runs whole programs and frees everything at shutdown, so there is no
//! collector, and the arena gives single-sweep teardown through `Drop`.
//!
//! BYTECODE:
//! ---------
//! A [`Chunk`] is a byte array of [`OpCode`]s and operands, a parallel
//! line table for diagnostics, and a constant pool indexed by a single
//! operand byte (so at most 256 constants per chunk). Functions own
//! their chunk; the top-level script is itself a function.
//!
//! HASH TABLE:
//! -----------
//! [`Table`] is open addressing with linear probing, interned-string
//! keys, tombstone deletion, and growth at 3/4 load. It backs both the
//! intern pool and the VM's global-variable table. Because keys are
//! interned, probing compares handles, never bytes; the one exception is
//! [`Table::find_string`], the pre-intern lookup.
//!
//! The disassembler in [`debug`] renders chunks for the driver's
//! `--emit-bytecode` mode, TRACE-level VM logging, and tests.

pub mod chunk;
pub mod debug;
pub mod object;
pub mod table;
pub mod value;

pub use chunk::{Chunk, OpCode};
pub use object::{FunObj, Heap, NativeFn, NativeObj, Obj, ObjRef, StrObj};
pub use table::Table;
pub use value::Value;
