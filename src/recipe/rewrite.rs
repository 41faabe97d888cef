//! The attribute rewriter: the crate's central algorithm.
//!
//! A recursive, pure tree-to-tree walk over a recipe body that turns
//! attribute-set statements into conditional attribute-map operations and
//! leaves every other statement untouched. Untouched subtrees are shared via
//! `Arc`, never copied.
//!
//! Per statement, in order: extract flags from the flagged-tuple shape;
//! normalize the force-operator spelling; rewrite attribute-set statements
//! into `attr/set!` / `attr/default!` calls wrapped per their flags;
//! delegate series blocks to the extractor; recurse into the children of any
//! other node kind — except call expressions, whose arguments are never
//! walked. That last exclusion is load-bearing: a pair-shaped argument like
//! `pair(x --> 1, y)` is user data, not an attribute statement.

use std::sync::Arc;

use crate::ast::{AstNode, Expr, SetOp, Span, Spanned};
use crate::diagnostics::RecipeError;
use crate::err_ctx;
use crate::recipe::series;

const FLAG_QUIET: &str = "quiet";
const FLAG_REQUIRE: &str = "require";
const FLAG_FORCE: &str = "force";

/// Flags riding on one attribute-set statement.
///
/// `quiet` and `require` are mutually exclusive by construction; when a
/// statement somehow carries both, `require` takes precedence.
#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    quiet: bool,
    require: bool,
    force: bool,
}

/// Rewrites one statement (and, recursively, everything under it).
///
/// Applied by [`Recipe::define`](crate::recipe::Recipe::define) to the whole
/// body block, and by the series extractor to series-block bodies, so
/// attribute-set statements nested anywhere outside call arguments are
/// rewritten.
pub fn rewrite(stmt: &AstNode) -> Result<AstNode, RecipeError> {
    let (inner, mut flags) = extract_flags(stmt);
    match inner.expr() {
        Expr::AttrSet {
            key,
            value,
            op,
            span,
        } => {
            if *op == SetOp::Force {
                flags.force = true;
            }
            rewrite_attr_set(key, value, flags, *span)
        }
        Expr::Series(body, span) => series::extract(body, *span),
        // Call arguments are never tree-walked.
        Expr::Call { .. } => Ok(inner.clone()),
        _ => rewrite_children(inner),
    }
}

// ---------------------------------------------------------------------------
// Flag extraction
// ---------------------------------------------------------------------------

/// Peels the flagged-tuple shape: a tuple whose first element is an
/// attribute-set statement, followed by flag symbols. Unknown trailing
/// symbols and non-symbol trailing items are ignored, not an error. Anything
/// else passes through with no flags.
fn extract_flags(stmt: &AstNode) -> (&AstNode, Flags) {
    let Expr::Tuple(items, _) = stmt.expr() else {
        return (stmt, Flags::default());
    };
    let Some(first) = items.first() else {
        return (stmt, Flags::default());
    };
    if !matches!(first.expr(), Expr::AttrSet { .. }) {
        return (stmt, Flags::default());
    }

    let mut flags = Flags::default();
    for item in &items[1..] {
        let flag = match item.expr() {
            Expr::Ident(name, _) | Expr::Sym(name, _) => name.as_str(),
            _ => continue,
        };
        match flag {
            FLAG_QUIET => flags.quiet = true,
            FLAG_REQUIRE => flags.require = true,
            FLAG_FORCE => flags.force = true,
            _ => {}
        }
    }
    (first, flags)
}

// ---------------------------------------------------------------------------
// Attribute-set rewriting
// ---------------------------------------------------------------------------

/// Builds the write operation for one attribute-set statement and wraps it
/// per its flags.
fn rewrite_attr_set(
    key: &AstNode,
    value: &AstNode,
    flags: Flags,
    span: Span,
) -> Result<AstNode, RecipeError> {
    let Some(name) = key.expr().as_key_literal() else {
        return Err(err_ctx!(
            Malformed,
            format!(
                "attribute key must be a literal name, got `{}`",
                key.expr().pretty()
            ),
            key.span,
            "write the key as an identifier, a `:symbol`, or a quoted string"
        ));
    };
    let key_sym = with_span(Expr::Sym(name.to_string(), key.span), key.span);

    // Force overwrites unconditionally; the plain spelling inserts only if
    // absent, so a caller-supplied value wins.
    let op = if flags.force {
        "attr/set!"
    } else {
        "attr/default!"
    };
    let write = emit_call(op, vec![key_sym.clone(), value.clone()], span);

    if flags.require {
        let condition = emit_call("backend/supports?", vec![key_sym.clone()], span);
        let fail = emit_call("backend/unsupported!", vec![key_sym], span);
        return Ok(with_span(
            Expr::If {
                condition: Box::new(condition),
                then_branch: Box::new(write),
                else_branch: Some(Box::new(fail)),
                span,
            },
            span,
        ));
    }
    if flags.quiet {
        let condition = emit_call("backend/supports?", vec![key_sym], span);
        return Ok(with_span(
            Expr::If {
                condition: Box::new(condition),
                then_branch: Box::new(write),
                else_branch: None,
                span,
            },
            span,
        ));
    }
    Ok(write)
}

// ---------------------------------------------------------------------------
// Recursive descent
// ---------------------------------------------------------------------------

/// Rebuilds a non-call node with every child rewritten, so attribute-set
/// statements inside conditionals, nested blocks, assignments, and tuples
/// are still found.
fn rewrite_children(node: &AstNode) -> Result<AstNode, RecipeError> {
    let rebuilt = match node.expr() {
        Expr::Block(stmts, span) => {
            let stmts = stmts.iter().map(rewrite).collect::<Result<Vec<_>, _>>()?;
            Expr::Block(stmts, *span)
        }
        Expr::Tuple(items, span) => {
            let items = items.iter().map(rewrite).collect::<Result<Vec<_>, _>>()?;
            Expr::Tuple(items, *span)
        }
        Expr::If {
            condition,
            then_branch,
            else_branch,
            span,
        } => Expr::If {
            condition: Box::new(rewrite(condition)?),
            then_branch: Box::new(rewrite(then_branch)?),
            else_branch: match else_branch {
                Some(other) => Some(Box::new(rewrite(other)?)),
                None => None,
            },
            span: *span,
        },
        Expr::Assign { name, value, span } => Expr::Assign {
            name: name.clone(),
            value: Box::new(rewrite(value)?),
            span: *span,
        },
        // Leaves and signature-only shapes pass through shared, not copied.
        _ => return Ok(node.clone()),
    };
    Ok(with_span(rebuilt, node.span))
}

// ---------------------------------------------------------------------------
// Emission helpers, shared with the extractor and the assembler
// ---------------------------------------------------------------------------

pub(crate) fn with_span(expr: Expr, span: Span) -> AstNode {
    Spanned {
        value: Arc::new(expr),
        span,
    }
}

pub(crate) fn emit_call(name: &str, args: Vec<AstNode>, span: Span) -> AstNode {
    let target = with_span(Expr::Ident(name.to_string(), span), span);
    with_span(
        Expr::Call {
            target: Box::new(target),
            args,
            span,
        },
        span,
    )
}
