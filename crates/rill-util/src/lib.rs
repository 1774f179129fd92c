//! rill-util - Diagnostics Foundation
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This crate provides the diagnostic types shared by every phase of the
//! interpreter. The scanner produces error tokens, the compiler reports
//! syntax and resolution errors, and the driver decides the process exit
//! code; all of them speak through the [`Handler`] defined here.
//!
//! DESIGN PRINCIPLES:
//! ------------------
//! 1. STREAMING REPORTS
//!    Diagnostics are printed to stderr the moment they are emitted, in
//!    source order, exactly as the user sees them. The handler also keeps
//!    every diagnostic so tests can assert on them without capturing
//!    process output.
//!
//! 2. LINE-ORIENTED LOCATIONS
//!    The language tracks source lines only (no columns, no spans). A
//!    diagnostic renders as one of:
//!
//!    ```text
//!    [line 3] Error at 'foo': Expected ';' after expression.
//!    [line 9] Error at end: Expected '}' after block.
//!    [line 2] Error: Unterminated string.
//!    ```
//!
//!    The bare form is used when the offending lexeme IS the message
//!    (scanner error tokens carry their message in place of a lexeme).
//!
//! 3. PANIC-MODE FRIENDLY
//!    The compiler suppresses cascading reports itself; the handler only
//!    counts what actually reaches it, so `error_count()` is the number
//!    of messages the user saw.

mod diagnostic;

pub use diagnostic::{Diagnostic, Handler, Level, Location};
