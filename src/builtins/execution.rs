//!
//! Special forms that control evaluation itself. Unlike pure and stateful
//! builtins these receive their arguments unevaluated, because evaluating
//! the body eagerly would run it against the parent attribute map instead
//! of the fork.

use crate::ast::value::Value;
use crate::builtins::helpers::special_form_arity_error;
use crate::builtins::{Builtin, BuiltinRegistry, SpecialFn};

/// Runs its body against a copy of the current attribute map and appends
/// one series record, then yields nil to the enclosing body. Writes inside
/// the body land on the copy; the parent map is untouched.
///
/// Usage: series!(<body>)
///
///   Returns: Nil
///
/// The rewriter emits this form for every `series { ... }` block, with the
/// body already rewritten.
pub const BUILTIN_SERIES: SpecialFn = |args, context| {
    if args.len() != 1 {
        let span = args.first().map(|node| node.span).unwrap_or_default();
        return Err(special_form_arity_error("series!", "1", args.len(), span));
    }
    context.fork_series(&args[0])?;
    Ok(Value::Nil)
};

/// Registers all execution builtins with the given registry.
pub fn register_execution_builtins(registry: &mut BuiltinRegistry) {
    registry.register("series!", Builtin::SpecialForm(BUILTIN_SERIES));
}
