//! AST module for the recipe engine
//!
//! This module provides the core expression-tree types for representing
//! recipe definitions with source location tracking: the span-carrying node
//! wrapper, the expression enum (including the two domain shapes the
//! rewriter recognizes), and the pretty-printer used by diagnostics.

// ============================================================================
// IMPORTS
// ============================================================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::types::TypeExpr;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Represents a span in the source code.
///
/// All tree nodes carry a span. Programmatically built trees default it;
/// a position-aware front-end fills it in, and diagnostics label it.
///
/// # Examples
///
/// ```rust
/// use seriate::ast::Span;
/// let span = Span { start: 0, end: 5 };
/// assert_eq!(span.start, 0);
/// assert_eq!(span.end, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Wrapper for carrying source span information with any value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Spanned { value, span }
    }
}

/// Canonical AST node type with shared ownership, so the rewriter can pass
/// untouched subtrees through without copying them.
pub type AstNode = Spanned<Arc<Expr>>;

impl Spanned<Arc<Expr>> {
    /// Borrows the wrapped expression.
    pub fn expr(&self) -> &Expr {
        &self.value
    }
}

/// Operator spelling of an attribute-set statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOp {
    /// `-->`: insert-if-absent; a caller-supplied value wins.
    Default,
    /// `:=`: unconditional overwrite (force implied).
    Force,
}

/// One `name = default` entry in a signature's keyword sub-list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KwPair {
    pub name: String,
    pub default: AstNode,
}

/// The core tree node for recipe expressions and statements.
///
/// Most kinds are ordinary expression shapes. `AttrSet` and `Series` are the
/// two domain shapes the rewriter recognizes; `Param` and `Keywords` appear
/// only inside call-form signatures.
///
/// # Examples
///
/// ```rust
/// use seriate::ast::{Expr, Span};
/// let expr = Expr::Number(42.0, Span { start: 0, end: 2 });
/// assert_eq!(expr.span(), Span { start: 0, end: 2 });
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// The "no value" sentinel literal.
    Nil(Span),
    Bool(bool, Span),
    Number(f64, Span),
    Str(String, Span),
    /// Symbolic literal such as `:red`.
    Sym(String, Span),
    /// Identifier reference, resolved against locals at evaluation time.
    Ident(String, Span),
    /// Function invocation. The rewriter never walks into `args`.
    Call {
        target: Box<AstNode>,
        args: Vec<AstNode>,
        span: Span,
    },
    Tuple(Vec<AstNode>, Span),
    /// Statement block; evaluates to its trailing expression.
    Block(Vec<AstNode>, Span),
    If {
        condition: Box<AstNode>,
        then_branch: Box<AstNode>,
        /// Absent else evaluates to nil.
        else_branch: Option<Box<AstNode>>,
        span: Span,
    },
    /// Local binding; evaluates to the bound value.
    Assign {
        name: String,
        value: Box<AstNode>,
        span: Span,
    },
    /// Attribute-set statement: `key --> value` or `key := value`.
    AttrSet {
        key: Box<AstNode>,
        value: Box<AstNode>,
        op: SetOp,
        span: Span,
    },
    /// Series block: forks the attribute map and appends its own record.
    /// The child must be a `Block`.
    Series(Box<AstNode>, Span),
    /// Positional signature parameter with optional annotation and default.
    Param {
        name: String,
        ty: Option<TypeExpr>,
        default: Option<Box<AstNode>>,
        span: Span,
    },
    /// The distinguished keyword-parameter sub-list of a signature.
    Keywords(Vec<KwPair>, Span),
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Expr {
    /// Returns the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Nil(span) => *span,
            Expr::Bool(_, span) => *span,
            Expr::Number(_, span) => *span,
            Expr::Str(_, span) => *span,
            Expr::Sym(_, span) => *span,
            Expr::Ident(_, span) => *span,
            Expr::Call { span, .. } => *span,
            Expr::Tuple(_, span) => *span,
            Expr::Block(_, span) => *span,
            Expr::If { span, .. } => *span,
            Expr::Assign { span, .. } => *span,
            Expr::AttrSet { span, .. } => *span,
            Expr::Series(_, span) => *span,
            Expr::Param { span, .. } => *span,
            Expr::Keywords(_, span) => *span,
        }
    }

    /// Borrows the statements of a `Block`, or `None` for any other kind.
    pub fn as_block(&self) -> Option<&[AstNode]> {
        if let Expr::Block(stmts, _) = self {
            Some(stmts)
        } else {
            None
        }
    }

    /// Borrows the key text of a key-shaped node. Attribute keys may be
    /// spelled as an identifier, a symbolic literal, or a quoted string.
    pub fn as_key_literal(&self) -> Option<&str> {
        match self {
            Expr::Ident(s, _) | Expr::Sym(s, _) | Expr::Str(s, _) => Some(s),
            _ => None,
        }
    }

    /// Pretty-prints the expression as a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seriate::ast::{Expr, Span};
    /// let expr = Expr::Ident("color".to_string(), Span::default());
    /// assert_eq!(expr.pretty(), "color");
    /// let expr2 = Expr::Sym("red".to_string(), Span::default());
    /// assert_eq!(expr2.pretty(), ":red");
    /// ```
    pub fn pretty(&self) -> String {
        match self {
            Expr::Nil(_) => "nil".to_string(),
            Expr::Bool(b, _) => b.to_string(),
            Expr::Number(n, _) => n.to_string(),
            Expr::Str(s, _) => format!("\"{}\"", s),
            Expr::Sym(s, _) => format!(":{}", s),
            Expr::Ident(s, _) => s.clone(),
            Expr::Call { target, args, .. } => {
                format!("{}({})", target.value.pretty(), Self::pretty_join(args))
            }
            Expr::Tuple(items, _) => format!("({})", Self::pretty_join(items)),
            Expr::Block(stmts, _) => Self::pretty_block(stmts),
            Expr::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => Self::pretty_if(condition, then_branch, else_branch.as_deref()),
            Expr::Assign { name, value, .. } => {
                format!("{} = {}", name, value.value.pretty())
            }
            Expr::AttrSet { key, value, op, .. } => {
                let arrow = match op {
                    SetOp::Default => "-->",
                    SetOp::Force => ":=",
                };
                format!("{} {} {}", key.value.pretty(), arrow, value.value.pretty())
            }
            Expr::Series(body, _) => format!("series {}", body.value.pretty()),
            Expr::Param { name, ty, default, .. } => Self::pretty_param(name, ty, default.as_deref()),
            Expr::Keywords(pairs, _) => {
                let inner = pairs
                    .iter()
                    .map(|kw| format!("{} = {}", kw.name, kw.default.value.pretty()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("kw({})", inner)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Pretty-printing helpers
    // ------------------------------------------------------------------------

    fn pretty_join(items: &[AstNode]) -> String {
        items
            .iter()
            .map(|e| e.value.pretty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn pretty_block(stmts: &[AstNode]) -> String {
        if stmts.is_empty() {
            return "{}".to_string();
        }
        let inner = stmts
            .iter()
            .map(|e| e.value.pretty())
            .collect::<Vec<_>>()
            .join("; ");
        format!("{{ {} }}", inner)
    }

    fn pretty_if(condition: &AstNode, then_branch: &AstNode, else_branch: Option<&AstNode>) -> String {
        match else_branch {
            Some(other) => format!(
                "if {} then {} else {}",
                condition.value.pretty(),
                then_branch.value.pretty(),
                other.value.pretty()
            ),
            None => format!(
                "if {} then {}",
                condition.value.pretty(),
                then_branch.value.pretty()
            ),
        }
    }

    fn pretty_param(name: &str, ty: &Option<TypeExpr>, default: Option<&AstNode>) -> String {
        let mut s = name.to_string();
        if let Some(ty) = ty {
            s.push_str(&format!(" :: {}", ty));
        }
        if let Some(default) = default {
            s.push_str(&format!(" = {}", default.value.pretty()));
        }
        s
    }
}

// ============================================================================
// MODULE EXPORTS
// ============================================================================

pub mod builder;
pub mod types;
pub mod value;
