//! The built-in Brio types.

use crate::symbol::{FunctionSig, Variable};

/// A Brio type.
///
/// The type system is a closed set of built-ins; there are no
/// user-defined types. Each type carries a source-language name and a
/// JVM-side name emitted verbatim by the generator.
///
/// `Any` and `Comparable` are special in assignability: `Any` accepts
/// every type, and `Comparable` accepts exactly `Integer`, `Decimal`,
/// `Character` and `String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Top type; accepts any value.
    Any,
    /// The type of `NIL`.
    Nil,
    /// `TRUE` / `FALSE`.
    Boolean,
    /// Arbitrary-precision integer, constrained to 32-bit signed range
    /// at the literal level.
    Integer,
    /// Arbitrary-precision decimal, constrained to double magnitude at
    /// the literal level.
    Decimal,
    /// A single character.
    Character,
    /// A character string.
    String,
    /// The ordered types: `Integer`, `Decimal`, `Character`, `String`.
    Comparable,
    /// A finite iterable of integers, as produced by `range`.
    IntegerIterable,
}

impl Type {
    /// The source-language name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            Type::Any => "Any",
            Type::Nil => "Nil",
            Type::Boolean => "Boolean",
            Type::Integer => "Integer",
            Type::Decimal => "Decimal",
            Type::Character => "Character",
            Type::String => "String",
            Type::Comparable => "Comparable",
            Type::IntegerIterable => "IntegerIterable",
        }
    }

    /// The JVM-side name emitted by the generator.
    pub fn jvm_name(&self) -> &'static str {
        match self {
            Type::Any => "Object",
            Type::Nil => "Void",
            Type::Boolean => "boolean",
            Type::Integer => "int",
            Type::Decimal => "double",
            Type::Character => "char",
            Type::String => "String",
            Type::Comparable => "Comparable",
            Type::IntegerIterable => "Iterable<Integer>",
        }
    }

    /// Resolves a source-language type name.
    pub fn from_name(name: &str) -> Option<Type> {
        match name {
            "Any" => Some(Type::Any),
            "Nil" => Some(Type::Nil),
            "Boolean" => Some(Type::Boolean),
            "Integer" => Some(Type::Integer),
            "Decimal" => Some(Type::Decimal),
            "Character" => Some(Type::Character),
            "String" => Some(Type::String),
            "Comparable" => Some(Type::Comparable),
            "IntegerIterable" => Some(Type::IntegerIterable),
            _ => None,
        }
    }

    /// Looks up a method on this type by name and arity.
    ///
    /// Receiver resolution goes through this table. None of the
    /// built-in types currently expose methods, so every lookup misses;
    /// the resolution path is still exercised by receiver expressions.
    pub fn method(&self, _name: &str, _arity: usize) -> Option<FunctionSig> {
        None
    }

    /// Looks up a field on this type by name.
    ///
    /// Like [`Type::method`], the built-in types declare no fields;
    /// only runtime objects carry fields.
    pub fn field(&self, _name: &str) -> Option<Variable> {
        None
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        let all = [
            Type::Any,
            Type::Nil,
            Type::Boolean,
            Type::Integer,
            Type::Decimal,
            Type::Character,
            Type::String,
            Type::Comparable,
            Type::IntegerIterable,
        ];
        for ty in all {
            assert_eq!(Type::from_name(ty.name()), Some(ty));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(Type::from_name("Object"), None);
        assert_eq!(Type::from_name("integer"), None);
        assert_eq!(Type::from_name(""), None);
    }

    #[test]
    fn test_jvm_names() {
        assert_eq!(Type::Integer.jvm_name(), "int");
        assert_eq!(Type::Any.jvm_name(), "Object");
        assert_eq!(Type::IntegerIterable.jvm_name(), "Iterable<Integer>");
    }

    #[test]
    fn test_builtin_types_have_no_members() {
        assert!(Type::String.method("size", 0).is_none());
        assert!(Type::Any.field("value").is_none());
    }
}
