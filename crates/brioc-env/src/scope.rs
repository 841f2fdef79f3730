//! Nested symbol tables as an arena of scopes.
//!
//! Scopes form a tree: each node has an optional parent and two
//! tables, `name -> variable` and `(name, arity) -> function`. Lookups
//! walk from a scope toward the root; definitions always install into
//! the target scope, so a child entry shadows a parent entry of the
//! same name without touching it.
//!
//! The tree is generic over its payloads. The analyzer instantiates it
//! with `Variable` / `FunctionSig`; the interpreter with its runtime
//! value and callable types. Method invocation needs children of
//! arbitrary scopes (a method body runs in a child of its *definition*
//! scope, not the caller's), which is why scopes are arena-allocated
//! and addressed by [`ScopeId`] instead of owned by their parents.

use rustc_hash::FxHashMap;

/// Handle to a scope in a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct ScopeData<V, F> {
    parent: Option<ScopeId>,
    variables: FxHashMap<String, V>,
    functions: FxHashMap<(String, usize), F>,
}

impl<V, F> ScopeData<V, F> {
    fn new(parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            variables: FxHashMap::default(),
            functions: FxHashMap::default(),
        }
    }
}

/// An arena of nested scopes with a current-scope cursor.
///
/// The cursor moves down with [`enter`](ScopeTree::enter) /
/// [`enter_at`](ScopeTree::enter_at) and must be restored with
/// [`exit_to`](ScopeTree::exit_to) on every exit path; the analyzer and
/// interpreter wrap that pair in a closure-scoped helper.
#[derive(Debug)]
pub struct ScopeTree<V, F> {
    scopes: Vec<ScopeData<V, F>>,
    current: ScopeId,
}

impl<V, F> ScopeTree<V, F> {
    /// Creates a tree containing only the root scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![ScopeData::new(None)],
            current: ScopeId(0),
        }
    }

    /// The root scope.
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// The scope the cursor is currently in.
    pub fn current(&self) -> ScopeId {
        self.current
    }

    /// Creates a child of the current scope and moves the cursor into it.
    pub fn enter(&mut self) -> ScopeId {
        let parent = self.current;
        self.enter_at(parent)
    }

    /// Creates a child of `parent` and moves the cursor into it.
    ///
    /// Used by method invocation, which chains on the method's
    /// definition scope rather than the caller's.
    pub fn enter_at(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeData::new(Some(parent)));
        self.current = id;
        id
    }

    /// Moves the cursor back to a previously saved scope.
    pub fn exit_to(&mut self, scope: ScopeId) {
        debug_assert!(scope.index() < self.scopes.len());
        self.current = scope;
    }

    /// Defines a variable in the current scope.
    ///
    /// Returns the previous entry if the name was already defined in
    /// this same scope (parent entries are shadowed, not replaced).
    pub fn define_variable(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        self.scopes[self.current.index()]
            .variables
            .insert(name.into(), value)
    }

    /// Defines a function in the current scope, keyed by name and arity.
    ///
    /// Returns the previous entry if the same (name, arity) pair was
    /// already defined in this scope.
    pub fn define_function(&mut self, name: impl Into<String>, arity: usize, f: F) -> Option<F> {
        self.scopes[self.current.index()]
            .functions
            .insert((name.into(), arity), f)
    }

    /// Looks up a variable, walking from the current scope to the root.
    pub fn lookup_variable(&self, name: &str) -> Option<&V> {
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let data = &self.scopes[id.index()];
            if let Some(v) = data.variables.get(name) {
                return Some(v);
            }
            scope = data.parent;
        }
        None
    }

    /// Mutable variant of [`lookup_variable`](ScopeTree::lookup_variable).
    pub fn lookup_variable_mut(&mut self, name: &str) -> Option<&mut V> {
        let mut scope = Some(self.current);
        let owner = loop {
            let id = scope?;
            let data = &self.scopes[id.index()];
            if data.variables.contains_key(name) {
                break id;
            }
            scope = data.parent;
        };
        self.scopes[owner.index()].variables.get_mut(name)
    }

    /// Looks up a function by name and arity, walking to the root.
    pub fn lookup_function(&self, name: &str, arity: usize) -> Option<&F> {
        let key = (name.to_string(), arity);
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let data = &self.scopes[id.index()];
            if let Some(f) = data.functions.get(&key) {
                return Some(f);
            }
            scope = data.parent;
        }
        None
    }
}

impl<V, F> Default for ScopeTree<V, F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_lookup() {
        let mut tree: ScopeTree<i32, ()> = ScopeTree::new();
        tree.define_variable("x", 1);
        assert_eq!(tree.lookup_variable("x"), Some(&1));
        assert_eq!(tree.lookup_variable("y"), None);
    }

    #[test]
    fn test_child_sees_parent() {
        let mut tree: ScopeTree<i32, ()> = ScopeTree::new();
        tree.define_variable("x", 1);
        tree.enter();
        assert_eq!(tree.lookup_variable("x"), Some(&1));
    }

    #[test]
    fn test_child_shadows_parent() {
        let mut tree: ScopeTree<i32, ()> = ScopeTree::new();
        tree.define_variable("x", 1);
        let root = tree.current();
        tree.enter();
        let shadowed = tree.define_variable("x", 2);
        assert_eq!(shadowed, None);
        assert_eq!(tree.lookup_variable("x"), Some(&2));

        tree.exit_to(root);
        assert_eq!(tree.lookup_variable("x"), Some(&1));
    }

    #[test]
    fn test_redefinition_in_same_scope_returns_previous() {
        let mut tree: ScopeTree<i32, ()> = ScopeTree::new();
        assert_eq!(tree.define_variable("x", 1), None);
        assert_eq!(tree.define_variable("x", 2), Some(1));
    }

    #[test]
    fn test_functions_keyed_by_arity() {
        let mut tree: ScopeTree<(), &str> = ScopeTree::new();
        tree.define_function("f", 0, "f/0");
        tree.define_function("f", 2, "f/2");
        assert_eq!(tree.lookup_function("f", 0), Some(&"f/0"));
        assert_eq!(tree.lookup_function("f", 2), Some(&"f/2"));
        assert_eq!(tree.lookup_function("f", 1), None);
    }

    #[test]
    fn test_enter_at_chains_on_definition_scope() {
        let mut tree: ScopeTree<i32, ()> = ScopeTree::new();
        tree.define_variable("global", 10);
        let root = tree.current();

        // Simulate a caller frame with a local the callee must not see.
        tree.enter();
        tree.define_variable("caller_local", 99);
        let caller = tree.current();

        // Callee frame chains on the root (its definition scope).
        tree.enter_at(root);
        assert_eq!(tree.lookup_variable("global"), Some(&10));
        assert_eq!(tree.lookup_variable("caller_local"), None);

        tree.exit_to(caller);
        assert_eq!(tree.lookup_variable("caller_local"), Some(&99));
    }

    #[test]
    fn test_lookup_variable_mut_updates_owning_scope() {
        let mut tree: ScopeTree<i32, ()> = ScopeTree::new();
        tree.define_variable("x", 1);
        let root = tree.current();
        tree.enter();
        *tree.lookup_variable_mut("x").unwrap() = 5;
        tree.exit_to(root);
        assert_eq!(tree.lookup_variable("x"), Some(&5));
    }
}
