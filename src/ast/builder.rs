//! # Tree Builder Module
//!
//! ## Purpose
//! Terse constructors for recipe trees. The engine operates on
//! already-parsed trees (there is no textual parser in this crate); this
//! module is how front-ends and tests produce them.
//!
//! ## Core Principles
//! - Pure, stateless, composable
//! - Every constructor returns a ready [`AstNode`]
//! - Spans default to `Span::default()`; a position-aware front-end builds
//!   `Expr` values directly when it has real offsets
//!
//! ## Invariants
//! - Never mutates input
//! - `flagged` always produces the tuple shape the rewriter recognizes

use std::sync::Arc;

use crate::ast::types::TypeExpr;
use crate::ast::{AstNode, Expr, KwPair, SetOp, Span, Spanned};

/// Wraps an expression into a node, taking the span the expression carries.
pub fn node(expr: Expr) -> AstNode {
    let span = expr.span();
    Spanned::new(Arc::new(expr), span)
}

pub fn nil() -> AstNode {
    node(Expr::Nil(Span::default()))
}

pub fn boolean(b: bool) -> AstNode {
    node(Expr::Bool(b, Span::default()))
}

pub fn num(n: f64) -> AstNode {
    node(Expr::Number(n, Span::default()))
}

pub fn text(s: &str) -> AstNode {
    node(Expr::Str(s.to_string(), Span::default()))
}

/// Symbolic literal, `:red`.
pub fn sym(s: &str) -> AstNode {
    node(Expr::Sym(s.to_string(), Span::default()))
}

/// Identifier reference, resolved against locals at evaluation time.
pub fn ident(s: &str) -> AstNode {
    node(Expr::Ident(s.to_string(), Span::default()))
}

/// Invocation of a named function: `name(args…)`.
pub fn call(name: &str, args: Vec<AstNode>) -> AstNode {
    call_expr(ident(name), args)
}

/// Invocation with an arbitrary target expression.
pub fn call_expr(target: AstNode, args: Vec<AstNode>) -> AstNode {
    node(Expr::Call {
        target: Box::new(target),
        args,
        span: Span::default(),
    })
}

pub fn tuple(items: Vec<AstNode>) -> AstNode {
    node(Expr::Tuple(items, Span::default()))
}

pub fn block(stmts: Vec<AstNode>) -> AstNode {
    node(Expr::Block(stmts, Span::default()))
}

pub fn if_then(condition: AstNode, then_branch: AstNode) -> AstNode {
    node(Expr::If {
        condition: Box::new(condition),
        then_branch: Box::new(then_branch),
        else_branch: None,
        span: Span::default(),
    })
}

pub fn if_else(condition: AstNode, then_branch: AstNode, else_branch: AstNode) -> AstNode {
    node(Expr::If {
        condition: Box::new(condition),
        then_branch: Box::new(then_branch),
        else_branch: Some(Box::new(else_branch)),
        span: Span::default(),
    })
}

pub fn assign(name: &str, value: AstNode) -> AstNode {
    node(Expr::Assign {
        name: name.to_string(),
        value: Box::new(value),
        span: Span::default(),
    })
}

/// Attribute-set statement with the default spelling: `key --> value`.
pub fn attr_default(key: AstNode, value: AstNode) -> AstNode {
    attr_set(key, value, SetOp::Default)
}

/// Attribute-set statement with the force spelling: `key := value`.
pub fn attr_force(key: AstNode, value: AstNode) -> AstNode {
    attr_set(key, value, SetOp::Force)
}

pub fn attr_set(key: AstNode, value: AstNode, op: SetOp) -> AstNode {
    node(Expr::AttrSet {
        key: Box::new(key),
        value: Box::new(value),
        op,
        span: Span::default(),
    })
}

/// Flagged-tuple shape: `(key --> value, quiet, …)`. Flags ride as trailing
/// identifiers; the rewriter also accepts the symbolic spelling.
pub fn flagged(set: AstNode, flags: &[&str]) -> AstNode {
    let mut items = vec![set];
    items.extend(flags.iter().map(|f| ident(f)));
    tuple(items)
}

/// Series block. `body` should be a [`block`].
pub fn series(body: AstNode) -> AstNode {
    node(Expr::Series(Box::new(body), Span::default()))
}

/// Unannotated positional signature parameter.
pub fn param(name: &str) -> AstNode {
    node(Expr::Param {
        name: name.to_string(),
        ty: None,
        default: None,
        span: Span::default(),
    })
}

/// Type-annotated positional signature parameter.
pub fn typed_param(name: &str, ty: TypeExpr) -> AstNode {
    node(Expr::Param {
        name: name.to_string(),
        ty: Some(ty),
        default: None,
        span: Span::default(),
    })
}

/// Positional signature parameter with a default expression.
pub fn defaulted_param(name: &str, ty: Option<TypeExpr>, default: AstNode) -> AstNode {
    node(Expr::Param {
        name: name.to_string(),
        ty,
        default: Some(Box::new(default)),
        span: Span::default(),
    })
}

/// The distinguished keyword-parameter sub-list: `kw(name = default, …)`.
pub fn keywords(pairs: Vec<(&str, AstNode)>) -> AstNode {
    let pairs = pairs
        .into_iter()
        .map(|(name, default)| KwPair {
            name: name.to_string(),
            default,
        })
        .collect();
    node(Expr::Keywords(pairs, Span::default()))
}

/// Call-form recipe signature: `name(params…)`. The keyword sub-list, when
/// present, must be the first parameter.
pub fn signature(name: &str, params: Vec<AstNode>) -> AstNode {
    call(name, params)
}
