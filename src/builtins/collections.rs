//!
//! Construction and inspection of lists, tuples, maps, and custom values.
//! `tuple` is how a recipe body returns several positional arguments at
//! once: a trailing tuple spreads into the series record's argument vector,
//! where a list stays a single argument.

use crate::ast::value::Value;
use crate::builtins::helpers::{arity_error, extract_key, extract_number};
use crate::builtins::{Builtin, BuiltinRegistry, PureFn};
use crate::err_msg;

// ============================================================================
// CONSTRUCTORS
// ============================================================================

/// Builds a list from its arguments.
///
/// Usage: list(<item> ...)
///
///   Returns: List
///
/// Example:
///   list(1, 2, 3)  =>  [1, 2, 3]
pub const BUILTIN_LIST: PureFn = |args| Ok(Value::List(args.to_vec()));

/// Builds a tuple from its arguments.
///
/// Usage: tuple(<item> ...)
///
///   Returns: Tuple
pub const BUILTIN_TUPLE: PureFn = |args| Ok(Value::Tuple(args.to_vec()));

/// Builds a two-element tuple, the shape `map` consumes.
///
/// Usage: pair(<key>, <value>)
///
///   Returns: Tuple of 2
pub const BUILTIN_PAIR: PureFn = |args| {
    if args.len() != 2 {
        return Err(arity_error("pair", "2", args.len()));
    }
    Ok(Value::Tuple(args.to_vec()))
};

/// Builds a map from key/value pairs. Each argument must be a two-element
/// tuple whose first element is a Sym or Str key; later pairs overwrite
/// earlier ones.
///
/// Usage: map(<pair> ...)
///
///   Returns: Map
///
/// Example:
///   map(pair(:a, 1), pair(:b, 2))  =>  {a: 1, b: 2}
pub const BUILTIN_MAP: PureFn = |args| {
    let mut entries = im::HashMap::new();
    for arg in args {
        let items = match arg {
            Value::Tuple(items) if items.len() == 2 => items,
            other => {
                return Err(err_msg!(
                    TypeError,
                    "map: expected a pair, got {}",
                    other.type_name()
                ));
            }
        };
        let key = extract_key(&items[0], "map")?;
        entries.insert(key.to_string(), items[1].clone());
    }
    Ok(Value::Map(entries))
};

// ============================================================================
// ACCESSORS
// ============================================================================

/// Number of elements in a collection, or characters in a string.
///
/// Usage: len(<list|tuple|map|str>)
///
///   Returns: Number
pub const BUILTIN_LEN: PureFn = |args| {
    if args.len() != 1 {
        return Err(arity_error("len", "1", args.len()));
    }
    let n = match &args[0] {
        Value::List(items) | Value::Tuple(items) => items.len(),
        Value::Map(entries) => entries.len(),
        Value::Str(s) => s.chars().count(),
        other => {
            return Err(err_msg!(
                TypeError,
                "len: expected a collection or string, got {}",
                other.type_name()
            ));
        }
    };
    Ok(Value::Number(n as f64))
};

/// Zero-based element access into a list or tuple. Out-of-range indices are
/// an error, not nil.
///
/// Usage: nth(<list|tuple>, <index>)
///
///   Returns: the element at <index>
///
/// Example:
///   nth(list(:a, :b, :c), 1)  =>  :b
pub const BUILTIN_NTH: PureFn = |args| {
    if args.len() != 2 {
        return Err(arity_error("nth", "2", args.len()));
    }
    let items = match &args[0] {
        Value::List(items) | Value::Tuple(items) => items,
        other => {
            return Err(err_msg!(
                TypeError,
                "nth: expected a list or tuple, got {}",
                other.type_name()
            ));
        }
    };
    let index = extract_number(&args[1], "nth")?;
    if !index.is_finite() || index.fract() != 0.0 || index < 0.0 {
        return Err(err_msg!(Eval, "nth: expected a non-negative integer index"));
    }
    items.get(index as usize).cloned().ok_or_else(|| {
        err_msg!(
            Eval,
            "nth: index {} out of range for length {}",
            index,
            items.len()
        )
    })
};

/// Reads a named field from a custom value. Missing fields are an error so
/// recipes fail loudly rather than silently plotting nil.
///
/// Usage: field(<custom>, <name>)
///
///   Returns: the field's value
///
/// Example:
///   field(wave, :amplitude)
pub const BUILTIN_FIELD: PureFn = |args| {
    if args.len() != 2 {
        return Err(arity_error("field", "2", args.len()));
    }
    let custom = match &args[0] {
        Value::Custom(custom) => custom,
        other => {
            return Err(err_msg!(
                TypeError,
                "field: expected a custom value, got {}",
                other.type_name()
            ));
        }
    };
    let name = extract_key(&args[1], "field")?;
    custom.field(name).cloned().ok_or_else(|| {
        err_msg!(Eval, "field: no field `{}` on `{}`", name, custom.ty)
    })
};

// ============================================================================
// REGISTRATION FUNCTION
// ============================================================================

/// Registers all collection builtins with the given registry.
pub fn register_collection_builtins(registry: &mut BuiltinRegistry) {
    registry.register("list", Builtin::Pure(BUILTIN_LIST));
    registry.register("tuple", Builtin::Pure(BUILTIN_TUPLE));
    registry.register("pair", Builtin::Pure(BUILTIN_PAIR));
    registry.register("map", Builtin::Pure(BUILTIN_MAP));
    registry.register("len", Builtin::Pure(BUILTIN_LEN));
    registry.register("nth", Builtin::Pure(BUILTIN_NTH));
    registry.register("field", Builtin::Pure(BUILTIN_FIELD));
}

// ============================================================================
// UNIT TESTS
// ============================================================================
