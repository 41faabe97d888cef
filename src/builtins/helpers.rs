//! Shared argument extraction and error construction for builtins.

use crate::ast::value::Value;
use crate::diagnostics::RecipeError;
use crate::{err_msg, err_ctx};

use crate::ast::Span;

/// Arity failure for a named builtin. `expected` reads like "2" or "1 or 2".
pub fn arity_error(name: &str, expected: &str, actual: usize) -> RecipeError {
    err_msg!(
        Eval,
        "{}: expected {} argument(s), got {}",
        name,
        expected,
        actual
    )
}

/// Extracts a number or reports which builtin wanted one.
pub fn extract_number(value: &Value, name: &str) -> Result<f64, RecipeError> {
    value.as_number().ok_or_else(|| {
        err_msg!(
            TypeError,
            "{}: expected Number, got {}",
            name,
            value.type_name()
        )
    })
}

/// Extracts an attribute key (symbol or string) or reports the mismatch.
pub fn extract_key<'a>(value: &'a Value, name: &str) -> Result<&'a str, RecipeError> {
    value.as_key().ok_or_else(|| {
        err_msg!(
            TypeError,
            "{}: expected a key (Sym or Str), got {}",
            name,
            value.type_name()
        )
    })
}

/// Extracts a strict boolean, as conditions and `not` require.
pub fn extract_bool(value: &Value, name: &str) -> Result<bool, RecipeError> {
    value.as_bool().ok_or_else(|| {
        err_msg!(
            TypeError,
            "{}: expected Bool, got {}",
            name,
            value.type_name()
        )
    })
}

/// Spanned arity failure for special forms, which do see their call site.
pub fn special_form_arity_error(
    name: &str,
    expected: &str,
    actual: usize,
    span: Span,
) -> RecipeError {
    err_ctx!(
        Eval,
        format!("{}: expected {} argument(s), got {}", name, expected, actual),
        span
    )
}
