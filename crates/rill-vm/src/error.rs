//! Error types for interpretation.

use thiserror::Error;

use rill_compile::CompileError;

/// Execution aborted: the message has already been printed to stderr
/// along with a stack trace.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RuntimeError {
    pub message: String,
}

/// Outcome of [`crate::Vm::interpret`]; the driver maps the variants to
/// exit codes 65 and 70.
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_error_displays_message() {
        let err = RuntimeError {
            message: "Undefined variable 'x'.".to_string(),
        };
        assert_eq!(err.to_string(), "Undefined variable 'x'.");
    }

    #[test]
    fn test_interpret_error_is_transparent() {
        let err = InterpretError::from(RuntimeError {
            message: "Stack overflow.".to_string(),
        });
        assert_eq!(err.to_string(), "Stack overflow.");
    }
}
