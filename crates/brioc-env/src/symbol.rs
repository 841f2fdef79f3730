//! Symbols bound by the analyzer: variables and function signatures.

use crate::types::Type;

/// Converts a Brio identifier into a legal JVM identifier.
///
/// Brio identifiers may contain `-`, which is invalid in Java; the
/// generator therefore emits the sanitized form everywhere.
pub fn jvm_name(name: &str) -> String {
    name.replace('-', "_")
}

/// A named, typed variable or field binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Source-language name.
    pub name: String,

    /// JVM-side name emitted by the generator.
    pub jvm_name: String,

    /// Resolved type.
    pub ty: Type,
}

impl Variable {
    /// Creates a variable whose JVM name is the sanitized source name.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        let name = name.into();
        let jvm_name = jvm_name(&name);
        Self { name, jvm_name, ty }
    }
}

/// A resolved function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSig {
    /// Source-language name.
    pub name: String,

    /// JVM-side name emitted by the generator. For built-ins this can
    /// be a dotted path (`System.out.println`).
    pub jvm_name: String,

    /// Declared parameter types, in order.
    pub parameter_types: Vec<Type>,

    /// Declared return type.
    pub return_type: Type,
}

impl FunctionSig {
    /// Creates a signature whose JVM name is the sanitized source name.
    pub fn new(name: impl Into<String>, parameter_types: Vec<Type>, return_type: Type) -> Self {
        let name = name.into();
        let jvm_name = jvm_name(&name);
        Self {
            name,
            jvm_name,
            parameter_types,
            return_type,
        }
    }

    /// Overrides the JVM name, for built-ins mapped to host functions.
    pub fn with_jvm_name(mut self, jvm_name: impl Into<String>) -> Self {
        self.jvm_name = jvm_name.into();
        self
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}
