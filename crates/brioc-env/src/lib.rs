//! brioc-env - Types, symbols and scopes for the Brio language.
//!
//! This crate is the environment model shared by the analyzer and the
//! interpreter:
//!
//! - [`Type`] - the closed set of built-in Brio types, each with a
//!   source name and a JVM-side name used by the generator.
//! - [`Variable`] and [`FunctionSig`] - the symbols the analyzer binds
//!   onto AST nodes.
//! - [`ScopeTree`] - an arena of nested symbol tables, generic over its
//!   variable and function payloads so the same structure backs both
//!   static analysis and runtime evaluation.
//! - [`builtins`] - the bindings installed in every root scope.
//!
//! Scopes form a tree with lookups walking toward the root; definitions
//! always land in the target scope, so a child entry shadows any parent
//! entry of the same name.

pub mod builtins;
pub mod scope;
pub mod symbol;
pub mod types;

pub use scope::{ScopeId, ScopeTree};
pub use symbol::{jvm_name, FunctionSig, Variable};
pub use types::Type;
