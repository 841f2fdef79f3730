//! brioc-drv - Pipeline driver for the Brio compiler.
//!
//! Orchestrates the phases end to end:
//!
//! ```text
//! text -> lex -> tokens -> parse -> AST -> analyze -> annotated AST
//!                                   -> interpret -> value
//!                                   -> generate  -> Java text
//! ```
//!
//! Each phase keeps its own error channel; [`PipelineError`] unifies
//! them for callers that drive the whole pipeline. The convenience
//! entry points are [`run`] (interpret, yielding `main()`'s value) and
//! [`compile`] (emit Java source). A [`Session`] pairs one named
//! source text with those entry points and renders positioned
//! diagnostics; the CLI drives everything through it.

use std::fs;
use std::io;
use std::path::Path;

use brioc_par::Source;
use brioc_util::{AnalysisError, ParseError, RuntimeError, SourceText};
use thiserror::Error;

pub use brioc_gen::GenError;
pub use brioc_int::Value;
pub use brioc_lex::{Token, TokenKind};

/// Any failure from any pipeline phase.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("generation error: {0}")]
    Gen(#[from] GenError),
}

impl PipelineError {
    /// Byte offset of the failure in the original source, when the
    /// phase recorded one.
    pub fn index(&self) -> Option<usize> {
        match self {
            PipelineError::Parse(err) => Some(err.index),
            PipelineError::Analysis(err) => err.index,
            PipelineError::Runtime(_) | PipelineError::Gen(_) => None,
        }
    }
}

/// Lexes source text into tokens.
pub fn lex(text: &str) -> Result<Vec<Token>, ParseError> {
    brioc_lex::lex(text)
}

/// Parses tokens into a source tree.
pub fn parse(tokens: Vec<Token>) -> Result<Source, ParseError> {
    brioc_par::parse(tokens)
}

/// Name-resolves and type-checks a source tree in place.
pub fn analyze(source: &mut Source) -> Result<(), AnalysisError> {
    brioc_sem::analyze(source)
}

/// Interprets an analyzed tree; `out` receives `print` output.
pub fn interpret(source: &Source, out: &mut dyn io::Write) -> Result<Value, RuntimeError> {
    brioc_int::interpret(source, out)
}

/// Emits Java source for an analyzed tree.
pub fn generate(source: &Source, sink: &mut dyn std::fmt::Write) -> Result<(), GenError> {
    brioc_gen::generate(source, sink)
}

/// Runs the frontend: lex, parse, analyze.
pub fn front(text: &str) -> Result<Source, PipelineError> {
    let tokens = brioc_lex::lex(text)?;
    tracing::debug!(tokens = tokens.len(), "lexed");

    let mut source = brioc_par::parse(tokens)?;
    tracing::debug!(
        fields = source.fields.len(),
        methods = source.methods.len(),
        "parsed"
    );

    brioc_sem::analyze(&mut source)?;
    tracing::debug!("analyzed");
    Ok(source)
}

/// Interprets a program from source text, returning `main()`'s value.
pub fn run(text: &str, out: &mut dyn io::Write) -> Result<Value, PipelineError> {
    let source = front(text)?;
    let value = brioc_int::interpret(&source, out)?;
    tracing::debug!(%value, "interpreted");
    Ok(value)
}

/// Transpiles a program from source text to Java source.
pub fn compile(text: &str) -> Result<String, PipelineError> {
    let source = front(text)?;
    let mut java = String::new();
    brioc_gen::generate(&source, &mut java)?;
    tracing::debug!(bytes = java.len(), "generated");
    Ok(java)
}

/// One compiler invocation over a single named source text.
///
/// The session owns the text and drives the pipeline over it; the name
/// (usually the source path) is used when rendering diagnostics as
/// `name:line:col: message`. Library callers that already hold plain
/// text can use the free functions directly.
pub struct Session {
    name: String,
    text: String,
}

impl Session {
    /// Creates a session over an in-memory source text.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Creates a session by reading a source file; the session's name
    /// is the path.
    pub fn load(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::new(path.display().to_string(), text))
    }

    /// The diagnostic name, usually the source path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lexes the source.
    pub fn tokens(&self) -> Result<Vec<Token>, PipelineError> {
        Ok(lex(&self.text)?)
    }

    /// Runs the frontend, yielding the analyzed tree.
    pub fn front(&self) -> Result<Source, PipelineError> {
        front(&self.text)
    }

    /// Interprets the program; `out` receives `print` output.
    pub fn run(&self, out: &mut dyn io::Write) -> Result<Value, PipelineError> {
        run(&self.text, out)
    }

    /// Transpiles the program to Java source.
    pub fn compile(&self) -> Result<String, PipelineError> {
        compile(&self.text)
    }

    /// Renders a pipeline error against this session's source, with a
    /// line/column position when the failing phase recorded a byte
    /// offset.
    pub fn render(&self, err: &PipelineError) -> String {
        match err.index() {
            Some(index) => {
                let source = SourceText::new(&self.text);
                let (line, column) = source.line_col(index);
                format!("{}:{}:{}: {}", self.name, line, column, err)
            }
            None => format!("{}: {}", self.name, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_yields_main_value_and_output() {
        let mut out = Vec::new();
        let value = run(
            "LET x = 1; DEF main() DO x = x + 2; print(x); RETURN 0; END",
            &mut out,
        )
        .unwrap();
        assert_eq!(value, Value::Integer(0.into()));
        assert_eq!(String::from_utf8(out).unwrap(), "3\n");
    }

    #[test]
    fn test_compile_produces_a_main_class() {
        let java = compile("DEF main() DO RETURN 0; END").unwrap();
        assert!(java.starts_with("public class Main {"));
        assert!(java.contains("System.exit(new Main().main());"));
    }

    #[test]
    fn test_phase_errors_keep_their_channel() {
        let mut out: Vec<u8> = Vec::new();

        let err = run("LET x = @;", &mut out).unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
        assert_eq!(err.index(), Some(8));

        let err = run("DEF main() DO LET x; RETURN 0; END", &mut out).unwrap_err();
        assert!(matches!(err, PipelineError::Analysis(_)));
        assert!(err.index().is_some());

        let err = run("DEF main() DO RETURN 1 / 0; END", &mut out).unwrap_err();
        assert!(matches!(err, PipelineError::Runtime(_)));
        assert_eq!(err.index(), None);
    }

    #[test]
    fn test_missing_main_is_an_unpositioned_analysis_error() {
        let err = compile("LET x = 1;").unwrap_err();
        assert!(matches!(err, PipelineError::Analysis(_)));
        assert_eq!(err.index(), None);
    }

    #[test]
    fn test_session_drives_every_phase() {
        let session = Session::new("demo.brio", "DEF main() DO RETURN 0; END");
        assert_eq!(session.name(), "demo.brio");
        assert_eq!(session.tokens().unwrap().len(), 9);
        assert_eq!(session.front().unwrap().methods.len(), 1);

        let mut out: Vec<u8> = Vec::new();
        assert_eq!(session.run(&mut out).unwrap(), Value::Integer(0.into()));
        assert!(out.is_empty());
        assert!(session.compile().unwrap().contains("int main() {"));
    }

    #[test]
    fn test_session_renders_errors_with_line_and_column() {
        let session = Session::new("demo.brio", "DEF main() DO\nRETURN 0 END");
        let mut out: Vec<u8> = Vec::new();
        let err = session.run(&mut out).unwrap_err();
        assert_eq!(session.render(&err), format!("demo.brio:2:10: {}", err));
    }

    #[test]
    fn test_session_renders_unpositioned_errors_without_location() {
        let session = Session::new("demo.brio", "LET x = 1;");
        let err = session.compile().unwrap_err();
        assert_eq!(session.render(&err), format!("demo.brio: {}", err));
    }
}
