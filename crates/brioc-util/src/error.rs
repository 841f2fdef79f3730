//! Error types for the Brio compilation pipeline.
//!
//! Three distinct failure channels, so callers can always tell a
//! compile-time fault from a run-time fault:
//!
//! - [`ParseError`] - lexer or parser failure, always positioned.
//! - [`AnalysisError`] - name-resolution or type-checking failure,
//!   positioned when the offending node is known.
//! - [`RuntimeError`] - interpreter failure.
//!
//! All three are fatal: the pipeline aborts on the first one and errors
//! are never aggregated.

use thiserror::Error;

/// A lexical or syntactic error.
///
/// `index` is the 0-based byte offset of the offending character or
/// token in the original source (or the source length when the input
/// ended unexpectedly).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at byte {index})")]
pub struct ParseError {
    /// Human-readable description of the failure.
    pub message: String,

    /// Byte offset into the original source text.
    pub index: usize,
}

impl ParseError {
    /// Creates a new parse error at the given byte offset.
    pub fn new(message: impl Into<String>, index: usize) -> Self {
        Self {
            message: message.into(),
            index,
        }
    }
}

/// A semantic error from name resolution or type checking.
///
/// The byte offset is optional: most violations point at a specific
/// node, but whole-program rules (a missing `main`, for example) have
/// no single offending location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AnalysisError {
    /// Human-readable description of the violation.
    pub message: String,

    /// Byte offset of the offending node, when known.
    pub index: Option<usize>,
}

impl AnalysisError {
    /// Creates an analysis error anchored at a byte offset.
    pub fn new(message: impl Into<String>, index: usize) -> Self {
        Self {
            message: message.into(),
            index: Some(index),
        }
    }

    /// Creates an analysis error with no source position.
    pub fn unpositioned(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            index: None,
        }
    }
}

/// A failure during interpretation.
///
/// Fatal to the current program run. The interpreter's internal
/// return-unwinding signal is not an error and never surfaces here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RuntimeError {
    /// Human-readable description of the failure.
    pub message: String,
}

impl RuntimeError {
    /// Creates a new runtime error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_includes_index() {
        let err = ParseError::new("unexpected character '@'", 17);
        assert_eq!(err.to_string(), "unexpected character '@' (at byte 17)");
    }

    #[test]
    fn test_analysis_error_positioned() {
        let err = AnalysisError::new("undefined variable 'x'", 4);
        assert_eq!(err.index, Some(4));
        assert_eq!(err.to_string(), "undefined variable 'x'");
    }

    #[test]
    fn test_analysis_error_unpositioned() {
        let err = AnalysisError::unpositioned("missing main/0 method");
        assert_eq!(err.index, None);
    }

    #[test]
    fn test_runtime_error_display() {
        let err = RuntimeError::new("division by zero");
        assert_eq!(err.to_string(), "division by zero");
    }
}
