//! brioc-util - Shared infrastructure for the Brio compiler.
//!
//! This crate holds the pieces every phase of the pipeline needs:
//! the three public error channels (parse, analysis, runtime) and the
//! [`SourceText`] helper that maps byte offsets back to line/column
//! positions for human-readable diagnostics.
//!
//! Every error produced by the pipeline carries a 0-based byte offset
//! into the original source text. The phases themselves never deal in
//! lines or columns; only the driver converts offsets for display.

pub mod error;
pub mod source;

pub use error::{AnalysisError, ParseError, RuntimeError};
pub use source::SourceText;
