//!
//! This module provides the attribute-map and backend operations for
//! generated recipe code. The rewriter emits `attr/set!`, `attr/default!`,
//! `backend/supports?`, and `backend/unsupported!`; the assembler's keyword
//! preamble and cleanup emit `attr/ensure!` and `attr/del!`. All are also
//! callable directly from recipe bodies.
//!
//! ## Builtins Provided
//!
//! - **Writes**: `attr/set!`, `attr/default!`, `attr/ensure!`, `attr/del!`
//! - **Reads**: `attr/get`, `attr/has?`
//! - **Backend**: `backend/supports?`, `backend/unsupported!`
//!
//! Write operations are statements and return nil, so a body whose trailing
//! expression is an attribute write contributes no main-body record.
//! `attr/ensure!` is the exception: it returns the value now present, which
//! the keyword preamble binds to a local.

use crate::ast::value::Value;
use crate::builtins::helpers::{arity_error, extract_key, special_form_arity_error};
use crate::builtins::{Builtin, BuiltinRegistry, SpecialFn, StatefulFn};
use crate::diagnostics::RecipeError;
use crate::runtime::eval::evaluate_node;

// ============================================================================
// WRITE OPERATIONS
// ============================================================================

/// Unconditionally writes an attribute.
///
/// Usage: attr/set!(<key>, <value>)
///   - <key>: Sym or Str
///   - <value>: any value
///
///   Returns: Nil
///
/// Example:
///   attr/set!(:color, :red)
pub const BUILTIN_ATTR_SET: StatefulFn = |args, state| {
    if args.len() != 2 {
        return Err(arity_error("attr/set!", "2", args.len()));
    }
    let key = extract_key(&args[0], "attr/set!")?;
    state.set_attr(key, args[1].clone());
    Ok(Value::Nil)
};

/// Writes an attribute only when the key is absent, so a caller-supplied
/// value wins.
///
/// Usage: attr/default!(<key>, <value>)
///
///   Returns: Nil
pub const BUILTIN_ATTR_DEFAULT: StatefulFn = |args, state| {
    if args.len() != 2 {
        return Err(arity_error("attr/default!", "2", args.len()));
    }
    let key = extract_key(&args[0], "attr/default!")?;
    state.set_attr_default(key, args[1].clone());
    Ok(Value::Nil)
};

/// Writes an attribute only when the key is absent, and returns whatever the
/// map now holds for it.
///
/// Usage: attr/ensure!(<key>, <default>)
///
///   Returns: the value now present under <key>
///
/// Example:
///   shape = attr/ensure!(:shape, :auto)
pub const BUILTIN_ATTR_ENSURE: StatefulFn = |args, state| {
    if args.len() != 2 {
        return Err(arity_error("attr/ensure!", "2", args.len()));
    }
    let key = extract_key(&args[0], "attr/ensure!")?;
    Ok(state.ensure_attr(key, args[1].clone()))
};

/// Removes an attribute if present.
///
/// Usage: attr/del!(<key>)
///
///   Returns: Nil
pub const BUILTIN_ATTR_DEL: StatefulFn = |args, state| {
    if args.len() != 1 {
        return Err(arity_error("attr/del!", "1", args.len()));
    }
    let key = extract_key(&args[0], "attr/del!")?;
    state.remove_attr(key);
    Ok(Value::Nil)
};

// ============================================================================
// READ OPERATIONS
// ============================================================================

/// Reads an attribute; absent keys read as nil.
///
/// Usage: attr/get(<key>)
///
///   Returns: the stored value, or Nil
pub const BUILTIN_ATTR_GET: StatefulFn = |args, state| {
    if args.len() != 1 {
        return Err(arity_error("attr/get", "1", args.len()));
    }
    let key = extract_key(&args[0], "attr/get")?;
    Ok(state.get_attr(key).unwrap_or(Value::Nil))
};

/// Whether an attribute key is present.
///
/// Usage: attr/has?(<key>)
///
///   Returns: Bool
pub const BUILTIN_ATTR_HAS: StatefulFn = |args, state| {
    if args.len() != 1 {
        return Err(arity_error("attr/has?", "1", args.len()));
    }
    let key = extract_key(&args[0], "attr/has?")?;
    Ok(Value::Bool(state.has_attr(key)))
};

// ============================================================================
// BACKEND OPERATIONS
// ============================================================================

/// Asks the backend-support predicate about one key.
///
/// Usage: backend/supports?(<key>)
///
///   Returns: Bool
pub const BUILTIN_BACKEND_SUPPORTS: StatefulFn = |args, state| {
    if args.len() != 1 {
        return Err(arity_error("backend/supports?", "1", args.len()));
    }
    let key = extract_key(&args[0], "backend/supports?")?;
    Ok(Value::Bool(state.backend_supports(key)))
};

/// Fails the invocation for a `require`-flagged attribute the backend
/// rejects. The rewriter emits this as the else arm of the support check,
/// with the statement's key node as the argument; a special form sees that
/// node unevaluated, so the error label lands on the offending statement
/// instead of nowhere.
///
/// Usage: backend/unsupported!(<key>)
///
///   Returns: never returns normally
pub const BUILTIN_BACKEND_UNSUPPORTED: SpecialFn = |args, context| {
    if args.len() != 1 {
        let span = args.first().map(|node| node.span).unwrap_or_default();
        return Err(special_form_arity_error(
            "backend/unsupported!",
            "1",
            args.len(),
            span,
        ));
    }
    let key = evaluate_node(&args[0], context)?;
    let key = extract_key(&key, "backend/unsupported!")?;
    Err(RecipeError::unsupported(
        key,
        context.backend.name(),
        args[0].span,
    ))
};

// ============================================================================
// REGISTRATION FUNCTION
// ============================================================================

/// Registers all attribute and backend builtins with the given registry.
pub fn register_attr_builtins(registry: &mut BuiltinRegistry) {
    registry.register("attr/set!", Builtin::Stateful(BUILTIN_ATTR_SET));
    registry.register("attr/default!", Builtin::Stateful(BUILTIN_ATTR_DEFAULT));
    registry.register("attr/ensure!", Builtin::Stateful(BUILTIN_ATTR_ENSURE));
    registry.register("attr/del!", Builtin::Stateful(BUILTIN_ATTR_DEL));
    registry.register("attr/get", Builtin::Stateful(BUILTIN_ATTR_GET));
    registry.register("attr/has?", Builtin::Stateful(BUILTIN_ATTR_HAS));
    registry.register(
        "backend/supports?",
        Builtin::Stateful(BUILTIN_BACKEND_SUPPORTS),
    );
    registry.register(
        "backend/unsupported!",
        Builtin::SpecialForm(BUILTIN_BACKEND_UNSUPPORTED),
    );
}
