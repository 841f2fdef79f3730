//! brioc-sem - Semantic analyzer for the Brio language.
//!
//! The analyzer walks the AST in document order and decorates it:
//! every expression node gets its resolved [`Type`](brioc_env::Type),
//! and every `Access`, `Call`, `Declaration`, `Field` and `Method` node
//! gets its bound symbol. The decorated tree is what the interpreter
//! and the generator consume.
//!
//! Scope discipline mirrors the runtime: fields and methods live in the
//! root scope, each method body in a child scope holding its parameters
//! plus a pseudo-variable `returnType` carrying the declared return
//! type (`RETURN` statements are checked against it). Every `IF` /
//! `FOR` / `WHILE` body opens a nested scope that is restored on all
//! exit paths.
//!
//! Analysis is failure-fast: the first violation aborts with an
//! [`AnalysisError`](brioc_util::AnalysisError).

mod analysis;

pub use analysis::Analyzer;

use brioc_par::Source;
use brioc_util::AnalysisError;

/// Analyzes a source tree in place.
///
/// On success every expression carries a resolved type and every
/// name-bearing node a bound symbol.
pub fn analyze(source: &mut Source) -> Result<(), AnalysisError> {
    Analyzer::new().analyze_source(source)
}
