//! Diagnostic types and the reporting handler.
//!
//! This module provides types for creating, formatting, and reporting
//! interpreter diagnostics. The compiler owns a [`Handler`] for the
//! duration of a compile and queries [`Handler::has_errors`] at the end
//! to decide whether a function object may be returned.

use std::fmt;

/// Diagnostic severity level.
///
/// # Examples
///
/// ```
/// use rill_util::Level;
///
/// assert_eq!(format!("{}", Level::Error), "Error");
/// assert_eq!(format!("{}", Level::Warning), "Warning");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// An error that prevents execution.
    Error,
    /// A warning that does not prevent execution.
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "Error"),
            Level::Warning => write!(f, "Warning"),
        }
    }
}

/// Where in the token stream a diagnostic points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// At a concrete lexeme: rendered as `at 'lexeme'`.
    At(String),
    /// At the end of input: rendered as `at end`.
    End,
    /// No lexeme; the message stands alone. Used for scanner error
    /// tokens, whose "lexeme" is already the message text.
    Bare,
}

/// A diagnostic message with severity, source line, and location.
///
/// # Examples
///
/// ```
/// use rill_util::{Diagnostic, Location};
///
/// let diag = Diagnostic::error(7, Location::At("}".into()), "Expected expression.");
/// assert_eq!(diag.to_string(), "[line 7] Error at '}': Expected expression.");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic severity level.
    pub level: Level,
    /// Source line (1-based) the diagnostic refers to.
    pub line: usize,
    /// Token-stream location.
    pub location: Location,
    /// Main diagnostic message.
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(
        level: Level,
        line: usize,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            line,
            location,
            message: message.into(),
        }
    }

    /// Create an error diagnostic.
    pub fn error(line: usize, location: Location, message: impl Into<String>) -> Self {
        Self::new(Level::Error, line, location, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] {}", self.line, self.level)?;
        match &self.location {
            Location::At(lexeme) => write!(f, " at '{}'", lexeme)?,
            Location::End => write!(f, " at end")?,
            Location::Bare => {}
        }
        write!(f, ": {}", self.message)
    }
}

/// Collects diagnostics and streams them to stderr.
///
/// One handler lives for one compile. The compiler emits through it as
/// errors are discovered; nothing is deferred or sorted.
///
/// # Examples
///
/// ```
/// use rill_util::{Diagnostic, Handler, Location};
///
/// let mut handler = Handler::silent();
/// handler.emit(Diagnostic::error(1, Location::End, "Expected expression."));
/// assert!(handler.has_errors());
/// assert_eq!(handler.error_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
    errors: usize,
    stream: bool,
}

impl Handler {
    /// Create a handler that prints each diagnostic to stderr as it is
    /// emitted. This is the handler the driver uses.
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            errors: 0,
            stream: true,
        }
    }

    /// Create a handler that only records diagnostics. Used by tests
    /// that assert on messages without touching process streams.
    pub fn silent() -> Self {
        Self {
            diagnostics: Vec::new(),
            errors: 0,
            stream: false,
        }
    }

    /// Emit one diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.level == Level::Error {
            self.errors += 1;
        }
        if self.stream {
            eprintln!("{}", diagnostic);
        }
        self.diagnostics.push(diagnostic);
    }

    /// True if at least one error-level diagnostic was emitted.
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Number of error-level diagnostics emitted.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// All diagnostics emitted so far, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
