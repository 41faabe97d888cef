//!
//! Comparison and boolean builtins. These produce the `Bool` conditions that
//! `if` branches on; `if` itself lives in the evaluator, not here, because it
//! must skip the untaken branch.

use crate::ast::value::Value;
use crate::builtins::helpers::{arity_error, extract_bool, extract_number};
use crate::builtins::{Builtin, BuiltinRegistry, PureFn};

// ============================================================================
// COMPARISON OPERATIONS
// ============================================================================

/// Structural equality over any two values.
///
/// Usage: eq?(<a>, <b>)
///
///   Returns: Bool
///
/// Example:
///   eq?(:red, :red)  =>  true
pub const BUILTIN_EQ: PureFn = |args| {
    if args.len() != 2 {
        return Err(arity_error("eq?", "2", args.len()));
    }
    Ok(Value::Bool(args[0] == args[1]))
};

/// Numeric less-than.
///
/// Usage: lt?(<a>, <b>)
///
///   Returns: Bool
pub const BUILTIN_LT: PureFn = |args| {
    if args.len() != 2 {
        return Err(arity_error("lt?", "2", args.len()));
    }
    let a = extract_number(&args[0], "lt?")?;
    let b = extract_number(&args[1], "lt?")?;
    Ok(Value::Bool(a < b))
};

/// Numeric greater-than.
///
/// Usage: gt?(<a>, <b>)
///
///   Returns: Bool
pub const BUILTIN_GT: PureFn = |args| {
    if args.len() != 2 {
        return Err(arity_error("gt?", "2", args.len()));
    }
    let a = extract_number(&args[0], "gt?")?;
    let b = extract_number(&args[1], "gt?")?;
    Ok(Value::Bool(a > b))
};

// ============================================================================
// BOOLEAN OPERATIONS
// ============================================================================

/// Boolean negation. The argument must already be a Bool; there is no
/// implicit truthiness.
///
/// Usage: not(<bool>)
///
///   Returns: Bool
pub const BUILTIN_NOT: PureFn = |args| {
    if args.len() != 1 {
        return Err(arity_error("not", "1", args.len()));
    }
    Ok(Value::Bool(!extract_bool(&args[0], "not")?))
};

// ============================================================================
// REGISTRATION FUNCTION
// ============================================================================

/// Registers all logic builtins with the given registry.
pub fn register_logic_builtins(registry: &mut BuiltinRegistry) {
    registry.register("eq?", Builtin::Pure(BUILTIN_EQ));
    registry.register("lt?", Builtin::Pure(BUILTIN_LT));
    registry.register("gt?", Builtin::Pure(BUILTIN_GT));
    registry.register("not", Builtin::Pure(BUILTIN_NOT));
}

// ============================================================================
// UNIT TESTS
// ============================================================================

#[cfg(test)]
mod logic_tests {
    use super::*;

    #[test]
    fn eq_compares_structurally() {
        let a = Value::List(vec![Value::Number(1.0), Value::Sym("x".into())]);
        let b = Value::List(vec![Value::Number(1.0), Value::Sym("x".into())]);
        assert_eq!(BUILTIN_EQ(&[a, b]).unwrap(), Value::Bool(true));
        assert_eq!(
            BUILTIN_EQ(&[Value::Number(1.0), Value::Str("1".into())]).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn comparisons_require_numbers() {
        assert!(BUILTIN_LT(&[Value::Str("a".into()), Value::Number(1.0)]).is_err());
        assert_eq!(
            BUILTIN_GT(&[Value::Number(2.0), Value::Number(1.0)]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn not_rejects_non_bools() {
        assert_eq!(BUILTIN_NOT(&[Value::Bool(true)]).unwrap(), Value::Bool(false));
        assert!(BUILTIN_NOT(&[Value::Nil]).is_err());
    }
}
