//! brioc-int - Tree-walking interpreter for the Brio language.
//!
//! Executes an analyzed AST directly and yields the value returned by
//! `main()`, which the CLI uses as the process exit code.
//!
//! Runtime structure mirrors the analyzer: the same arena-backed
//! [`ScopeTree`](brioc_env::ScopeTree), instantiated with runtime
//! payloads. Fields and methods bind in the global scope; a method
//! invocation opens a fresh scope chained on the method's *definition*
//! scope and binds parameters to arguments positionally.
//!
//! `RETURN` is a non-local transfer encoded as data, not an exception:
//! every statement reports whether control flows on or unwinds with a
//! value, bodies propagate the unwinding upward, and the
//! method-invocation boundary turns it into the call's result. Falling
//! off the end of a method yields `NIL`. The signal never escapes the
//! interpreter.
//!
//! Arithmetic stays at arbitrary precision regardless of the
//! analyzer's literal-range checks; decimal division rounds half-even
//! at the dividend's scale.

mod interp;
pub mod value;

pub use interp::{interpret, Builtin, Interpreter, MethodDef, RuntimeFn};
pub use value::{RuntimeObject, Value};
