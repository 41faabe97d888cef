//!
//! Builtins that reach outside the attribute map. Currently that is only
//! `rand`, which draws from the evaluation context's seeded generator so a
//! reseeded context replays the same draws.

use crate::ast::value::Value;
use crate::builtins::helpers::{arity_error, extract_number};
use crate::builtins::{Builtin, BuiltinRegistry, StatefulFn};
use crate::err_msg;

/// Uniform random numbers in `[0, 1)`.
///
/// Usage: rand()
///        rand(<n>)
///   - With no arguments, one Number.
///   - With a count, a List of <n> Numbers. The count must be a
///     non-negative integer.
///
///   Returns: Number or List of Numbers
///
/// Example:
///   rand(10)  =>  a 10-element list of samples
pub const BUILTIN_RAND: StatefulFn = |args, state| {
    match args.len() {
        0 => Ok(Value::Number(state.next_random())),
        1 => {
            let n = extract_number(&args[0], "rand")?;
            if !n.is_finite() || n.fract() != 0.0 || n < 0.0 {
                return Err(err_msg!(
                    Eval,
                    "rand: expected a non-negative integer count, got {}",
                    args[0]
                ));
            }
            let samples = (0..n as u64)
                .map(|_| Value::Number(state.next_random()))
                .collect();
            Ok(Value::List(samples))
        }
        actual => Err(arity_error("rand", "0 or 1", actual)),
    }
};

/// Registers all external builtins with the given registry.
pub fn register_external_builtins(registry: &mut BuiltinRegistry) {
    registry.register("rand", Builtin::Stateful(BUILTIN_RAND));
}
