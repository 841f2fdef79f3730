//! Built-in bindings installed in every root scope.

use crate::scope::ScopeTree;
use crate::symbol::{FunctionSig, Variable};
use crate::types::Type;

/// Name of the built-in print function.
pub const PRINT: &str = "print";

/// Name of the built-in range function.
pub const RANGE: &str = "range";

/// Installs the built-in function signatures into the root scope of an
/// analysis scope tree.
///
/// - `print(Any) -> Nil`, emitted as `System.out.println` by the
///   generator; the interpreter writes a line to its output sink.
/// - `range(Integer, Integer) -> IntegerIterable`, the host-supplied
///   half-open integer range.
pub fn install_builtins(scopes: &mut ScopeTree<Variable, FunctionSig>) {
    scopes.define_function(
        PRINT,
        1,
        FunctionSig::new(PRINT, vec![Type::Any], Type::Nil).with_jvm_name("System.out.println"),
    );
    scopes.define_function(
        RANGE,
        2,
        FunctionSig::new(RANGE, vec![Type::Integer, Type::Integer], Type::IntegerIterable),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_resolve_from_root() {
        let mut scopes = ScopeTree::new();
        install_builtins(&mut scopes);

        let print = scopes.lookup_function(PRINT, 1).unwrap();
        assert_eq!(print.parameter_types, vec![Type::Any]);
        assert_eq!(print.return_type, Type::Nil);
        assert_eq!(print.jvm_name, "System.out.println");

        let range = scopes.lookup_function(RANGE, 2).unwrap();
        assert_eq!(range.return_type, Type::IntegerIterable);
    }

    #[test]
    fn test_builtins_visible_from_nested_scope() {
        let mut scopes = ScopeTree::new();
        install_builtins(&mut scopes);
        scopes.enter();
        scopes.enter();
        assert!(scopes.lookup_function(PRINT, 1).is_some());
        assert!(scopes.lookup_function(PRINT, 2).is_none());
    }
}
