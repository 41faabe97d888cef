//! The series-block extractor.
//!
//! A `series { … }` block becomes a `series!(rewritten-block)` call. At
//! invocation time the `series!` special form forks the current attribute
//! map, runs the block against the fork, and appends one record built from
//! the fork and the block's trailing value; the call itself evaluates to
//! nil, so a series block never contributes to the enclosing result. Fork
//! order is the textual order of series blocks in the single top-to-bottom
//! walk.

use crate::ast::{AstNode, Span};
use crate::diagnostics::RecipeError;
use crate::err_ctx;
use crate::recipe::rewrite::{emit_call, rewrite};

/// Converts a series-block body into the fork-and-record call.
///
/// The body is rewritten fully recursively before embedding — attribute-set
/// statements anywhere inside it, including inside nested sub-blocks and
/// nested series blocks, behave exactly as at top level, scoped to the fork.
pub fn extract(body: &AstNode, span: Span) -> Result<AstNode, RecipeError> {
    if body.expr().as_block().is_none() {
        return Err(err_ctx!(
            Malformed,
            format!(
                "series block body must be a statement block, got `{}`",
                body.expr().pretty()
            ),
            span,
            "wrap the series contents in a block"
        ));
    }
    let rewritten = rewrite(body)?;
    Ok(emit_call("series!", vec![rewritten], span))
}
