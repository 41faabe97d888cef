//! # Builtin Function System
//!
//! Builtins are the native operations callable from recipe bodies. The
//! rewriter and assembler emit calls to a handful of them (`attr/set!`,
//! `attr/default!`, `attr/ensure!`, `attr/del!`, `backend/supports?`,
//! `backend/unsupported!`, `series!`); the rest exist so bodies can compute
//! data.
//!
//! ## Module Structure
//!
//! - **`helpers`**: Shared argument extraction and error construction
//! - **`attrs`**: Attribute-map and backend operations
//! - **`math`**: Mathematical operations (`+`, `-`, `*`, `/`, etc.)
//! - **`logic`**: Logic and comparison operations (`eq?`, `not`, etc.)
//! - **`collections`**: Collection operations (`list`, `tuple`, `field`, etc.)
//! - **`external`**: Data synthesis (`rand`)
//! - **`execution`**: The `series!` fork special form
//!
//! ## Calling Conventions
//!
//! Three conventions, and it is a contract violation to misclassify one:
//! **Pure** builtins see evaluated values only; **Stateful** builtins
//! additionally get the narrow [`StateContext`] facade (attribute map,
//! backend predicate, PRNG); **SpecialForm** builtins receive their argument
//! trees unevaluated plus the full evaluation context.

use im::HashMap;
use once_cell::sync::Lazy;

use crate::ast::value::Value;
use crate::ast::AstNode;
use crate::diagnostics::RecipeError;
use crate::runtime::eval::EvalContext;

// ============================================================================
// CORE TYPES AND TRAITS
// ============================================================================

/// Pure builtins: operate only on values, no state access
pub type PureFn = fn(args: &[Value]) -> Result<Value, RecipeError>;

/// Stateful builtins: need limited state access via the Context facade
pub type StatefulFn =
    fn(args: &[Value], state: &mut dyn StateContext) -> Result<Value, RecipeError>;

/// Special forms: receive unevaluated argument trees and the full context
pub type SpecialFn =
    fn(args: &[AstNode], context: &mut EvalContext) -> Result<Value, RecipeError>;

/// The unified builtin representation supporting three calling conventions
#[derive(Clone)]
pub enum Builtin {
    Pure(PureFn),
    Stateful(StatefulFn),
    SpecialForm(SpecialFn),
}

/// Minimal state interface for stateful builtins
pub trait StateContext {
    fn get_attr(&self, key: &str) -> Option<Value>;
    fn set_attr(&mut self, key: &str, value: Value);
    fn set_attr_default(&mut self, key: &str, value: Value);
    fn ensure_attr(&mut self, key: &str, default: Value) -> Value;
    fn remove_attr(&mut self, key: &str);
    fn has_attr(&self, key: &str) -> bool;
    fn backend_supports(&self, key: &str) -> bool;
    fn backend_name(&self) -> &str;
    /// A number in [0, 1) from the context's PRNG.
    fn next_random(&mut self) -> f64;
}

// Registry for all builtins, inspectable at runtime.
#[derive(Default)]
pub struct BuiltinRegistry {
    builtins: HashMap<String, Builtin>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.builtins.get(name)
    }

    pub fn list(&self) -> Vec<String> {
        self.builtins.keys().cloned().collect()
    }

    // API for extensibility.
    pub fn register(&mut self, name: &str, func: Builtin) {
        self.builtins.insert(name.to_string(), func);
    }

    pub fn has(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.builtins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builtins.is_empty()
    }
}

// ============================================================================
// MODULAR BUILTIN IMPLEMENTATIONS
// ============================================================================

// Shared infrastructure
pub mod helpers;

// Domain-specific builtin modules
pub mod attrs;
pub mod collections;
pub mod execution;
pub mod external;
pub mod logic;
pub mod math;

// ============================================================================
// UNIFIED REGISTRATION
// ============================================================================

/// Registers all standard builtins from all modules with the given registry.
pub fn register_all_builtins(registry: &mut BuiltinRegistry) {
    attrs::register_attr_builtins(registry);
    math::register_math_builtins(registry);
    logic::register_logic_builtins(registry);
    collections::register_collection_builtins(registry);
    external::register_external_builtins(registry);
    execution::register_execution_builtins(registry);
}

static CANONICAL: Lazy<BuiltinRegistry> = Lazy::new(|| {
    let mut registry = BuiltinRegistry::new();
    register_all_builtins(&mut registry);
    registry
});

/// The canonical builtin table, built once per process. Every generated
/// function evaluates against this.
pub fn canonical() -> &'static BuiltinRegistry {
    &CANONICAL
}

#[cfg(test)]
mod builtins_tests {
    use super::*;

    #[test]
    fn test_canonical_table_has_emitted_operations() {
        let registry = canonical();
        for name in [
            "attr/set!",
            "attr/default!",
            "attr/ensure!",
            "attr/del!",
            "backend/supports?",
            "backend/unsupported!",
            "series!",
        ] {
            assert!(registry.has(name), "missing builtin `{name}`");
        }
        assert!(!registry.is_empty());
        assert_eq!(registry.list().len(), registry.len());
    }
}
