//!
//! Arithmetic builtins for recipe bodies. All operations here are pure:
//! they see their evaluated arguments and touch no attribute state.

use crate::ast::value::Value;
use crate::builtins::helpers::{arity_error, extract_number};
use crate::builtins::{Builtin, BuiltinRegistry, PureFn};
use crate::err_msg;

// ============================================================================
// ARITHMETIC OPERATIONS
// ============================================================================

/// Adds numbers.
///
/// Usage: +(<num> ...)
///   - Accepts zero or more arguments.
///
///   Returns: Number
///
/// Example:
///   +(1, 2, 3)  =>  6
pub const BUILTIN_ADD: PureFn = |args| {
    let mut sum = 0.0;
    for arg in args {
        sum += extract_number(arg, "+")?;
    }
    Ok(Value::Number(sum))
};

/// Subtracts numbers left to right; a single argument negates.
///
/// Usage: -(<num1>, <num2> ...)
///
///   Returns: Number
///
/// Example:
///   -(10, 3, 2)  =>  5
///   -(4)         =>  -4
pub const BUILTIN_SUB: PureFn = |args| {
    if args.is_empty() {
        return Err(arity_error("-", "at least 1", args.len()));
    }
    let first = extract_number(&args[0], "-")?;
    if args.len() == 1 {
        return Ok(Value::Number(-first));
    }
    let mut acc = first;
    for arg in &args[1..] {
        acc -= extract_number(arg, "-")?;
    }
    Ok(Value::Number(acc))
};

/// Multiplies numbers.
///
/// Usage: *(<num> ...)
///   - Accepts zero or more arguments.
///
///   Returns: Number
pub const BUILTIN_MUL: PureFn = |args| {
    let mut product = 1.0;
    for arg in args {
        product *= extract_number(arg, "*")?;
    }
    Ok(Value::Number(product))
};

/// Divides numbers left to right. Division by zero is an error.
///
/// Usage: /(<num1>, <num2> ...)
///
///   Returns: Number
///
/// Example:
///   /(12, 3, 2)  =>  2
pub const BUILTIN_DIV: PureFn = |args| {
    if args.len() < 2 {
        return Err(arity_error("/", "at least 2", args.len()));
    }
    let mut acc = extract_number(&args[0], "/")?;
    for arg in &args[1..] {
        let divisor = extract_number(arg, "/")?;
        if divisor == 0.0 {
            return Err(err_msg!(Eval, "/: division by zero"));
        }
        acc /= divisor;
    }
    Ok(Value::Number(acc))
};

/// Floored modulo of two numbers. The result carries the divisor's sign.
///
/// Usage: mod(<num>, <divisor>)
///
///   Returns: Number
///
/// Example:
///   mod(7, 3)  =>  1
pub const BUILTIN_MOD: PureFn = |args| {
    if args.len() != 2 {
        return Err(arity_error("mod", "2", args.len()));
    }
    let n = extract_number(&args[0], "mod")?;
    let d = extract_number(&args[1], "mod")?;
    if d == 0.0 {
        return Err(err_msg!(Eval, "mod: modulo by zero"));
    }
    Ok(Value::Number(n.rem_euclid(d)))
};

// ============================================================================
// NUMERIC HELPERS
// ============================================================================

/// Absolute value.
///
/// Usage: abs(<num>)
///
///   Returns: Number
pub const BUILTIN_ABS: PureFn = |args| {
    if args.len() != 1 {
        return Err(arity_error("abs", "1", args.len()));
    }
    Ok(Value::Number(extract_number(&args[0], "abs")?.abs()))
};

/// Smallest of its arguments.
///
/// Usage: min(<num1>, <num2> ...)
///
///   Returns: Number
pub const BUILTIN_MIN: PureFn = |args| {
    if args.is_empty() {
        return Err(arity_error("min", "at least 1", args.len()));
    }
    let mut best = extract_number(&args[0], "min")?;
    for arg in &args[1..] {
        best = best.min(extract_number(arg, "min")?);
    }
    Ok(Value::Number(best))
};

/// Largest of its arguments.
///
/// Usage: max(<num1>, <num2> ...)
///
///   Returns: Number
pub const BUILTIN_MAX: PureFn = |args| {
    if args.is_empty() {
        return Err(arity_error("max", "at least 1", args.len()));
    }
    let mut best = extract_number(&args[0], "max")?;
    for arg in &args[1..] {
        best = best.max(extract_number(arg, "max")?);
    }
    Ok(Value::Number(best))
};

/// Builds the list `[1, 2, ..., n]`. The bound must be a non-negative
/// integer; `range(0)` is the empty list.
///
/// Usage: range(<n>)
///
///   Returns: List of Numbers
///
/// Example:
///   range(4)  =>  [1, 2, 3, 4]
pub const BUILTIN_RANGE: PureFn = |args| {
    if args.len() != 1 {
        return Err(arity_error("range", "1", args.len()));
    }
    let n = extract_number(&args[0], "range")?;
    if !n.is_finite() || n.fract() != 0.0 || n < 0.0 {
        return Err(err_msg!(
            Eval,
            "range: expected a non-negative integer, got {}",
            args[0]
        ));
    }
    let items = (1..=n as u64).map(|i| Value::Number(i as f64)).collect();
    Ok(Value::List(items))
};

// ============================================================================
// REGISTRATION FUNCTION
// ============================================================================

/// Registers all math builtins with the given registry.
pub fn register_math_builtins(registry: &mut BuiltinRegistry) {
    registry.register("+", Builtin::Pure(BUILTIN_ADD));
    registry.register("-", Builtin::Pure(BUILTIN_SUB));
    registry.register("*", Builtin::Pure(BUILTIN_MUL));
    registry.register("/", Builtin::Pure(BUILTIN_DIV));
    registry.register("mod", Builtin::Pure(BUILTIN_MOD));
    registry.register("abs", Builtin::Pure(BUILTIN_ABS));
    registry.register("min", Builtin::Pure(BUILTIN_MIN));
    registry.register("max", Builtin::Pure(BUILTIN_MAX));
    registry.register("range", Builtin::Pure(BUILTIN_RANGE));
}

// ============================================================================
// UNIT TESTS
// ============================================================================

#[cfg(test)]
mod math_tests {
    use super::*;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn add_is_variadic() {
        assert_eq!(BUILTIN_ADD(&[]).unwrap(), num(0.0));
        assert_eq!(BUILTIN_ADD(&[num(1.0), num(2.0), num(3.0)]).unwrap(), num(6.0));
    }

    #[test]
    fn single_argument_sub_negates() {
        assert_eq!(BUILTIN_SUB(&[num(4.0)]).unwrap(), num(-4.0));
        assert_eq!(BUILTIN_SUB(&[num(10.0), num(3.0)]).unwrap(), num(7.0));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let err = BUILTIN_DIV(&[num(1.0), num(0.0)]).unwrap_err();
        assert!(err.to_string().contains("division by zero"));
    }

    #[test]
    fn mod_is_floored() {
        assert_eq!(BUILTIN_MOD(&[num(7.0), num(3.0)]).unwrap(), num(1.0));
        assert_eq!(BUILTIN_MOD(&[num(-7.0), num(3.0)]).unwrap(), num(2.0));
    }

    #[test]
    fn range_builds_one_based_list() {
        let out = BUILTIN_RANGE(&[num(3.0)]).unwrap();
        assert_eq!(out, Value::List(vec![num(1.0), num(2.0), num(3.0)]));
        assert_eq!(BUILTIN_RANGE(&[num(0.0)]).unwrap(), Value::List(vec![]));
    }

    #[test]
    fn range_rejects_fractional_and_negative_bounds() {
        assert!(BUILTIN_RANGE(&[num(1.5)]).is_err());
        assert!(BUILTIN_RANGE(&[num(-2.0)]).is_err());
    }

    #[test]
    fn type_errors_name_the_operation() {
        let err = BUILTIN_ADD(&[Value::Str("x".into())]).unwrap_err();
        assert!(err.to_string().contains("+"));
    }
}
