//! The tree evaluator that runs a recipe's rewritten body.
//!
//! Transformation produces an ordinary expression tree; each invocation of a
//! generated function walks that tree here, against its own attribute map,
//! locals, record accumulator, and PRNG.
//!
//! ## CRITICAL: Builtin Calling Conventions
//!
//! This module dispatches to builtins based on their registered [`Builtin`]
//! variant (`Pure`, `Stateful`, or `SpecialForm`). `Pure` and `Stateful`
//! builtins have their arguments eagerly evaluated, while `SpecialForm`
//! builtins receive unevaluated `AstNode`s to manage their own evaluation.
//! `series!` depends on this: evaluating its body eagerly would run it
//! against the parent attribute map instead of the fork.
//!
//! **It is a contract violation to misclassify a builtin.** See the
//! documentation in `src/builtins/mod.rs`.

use std::collections::HashMap;

use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::ast::value::Value;
use crate::ast::{AstNode, Expr};
use crate::builtins::{Builtin, BuiltinRegistry, StateContext};
use crate::diagnostics::RecipeError;
use crate::err_ctx;
use crate::runtime::attrs::AttrMap;
use crate::runtime::backend::Backend;
use crate::runtime::record::{wrap_args, SeriesRecord};

/// Recursion ceiling for body evaluation. Exceeding it is an `Internal`
/// error rather than a stack overflow.
pub const MAX_EVAL_DEPTH: usize = 256;

// ===================================================================================================
// CORE DATA STRUCTURES: Evaluation Context
// ===================================================================================================

/// The context for a single invocation, passed to builtins and all
/// evaluation functions. Each invocation owns its locals, record list, and
/// PRNG; nothing is shared across invocations.
pub struct EvalContext<'a> {
    pub attrs: &'a mut AttrMap,
    pub backend: &'a dyn Backend,
    pub builtins: &'a BuiltinRegistry,
    pub records: &'a mut Vec<SeriesRecord>,
    pub locals: HashMap<String, Value>,
    pub rng: &'a mut Xoshiro256StarStar,
    pub max_depth: usize,
    pub depth: usize,
}

impl EvalContext<'_> {
    /// Runs a series-block body against a fork of the current attribute map
    /// and appends one record built from the fork and the body's trailing
    /// value. The body sees the enclosing locals; bindings it makes are
    /// dropped at block exit. Nested series blocks inside the body append
    /// their own records first, so record order follows evaluation order.
    pub fn fork_series(&mut self, body: &AstNode) -> Result<(), RecipeError> {
        let mut forked = self.attrs.fork();
        let trailing = {
            let mut sub = EvalContext {
                attrs: &mut forked,
                backend: self.backend,
                builtins: self.builtins,
                records: &mut *self.records,
                locals: self.locals.clone(),
                rng: &mut *self.rng,
                max_depth: self.max_depth,
                depth: self.depth + 1,
            };
            evaluate_node(body, &mut sub)?
        };
        // A series block always yields a record; a nil trailing value
        // becomes the one-element pack `(nil,)`.
        self.records
            .push(SeriesRecord::new(forked, wrap_args(trailing)));
        Ok(())
    }
}

impl StateContext for EvalContext<'_> {
    fn get_attr(&self, key: &str) -> Option<Value> {
        self.attrs.get(key).cloned()
    }

    fn set_attr(&mut self, key: &str, value: Value) {
        self.attrs.set(key, value);
    }

    fn set_attr_default(&mut self, key: &str, value: Value) {
        self.attrs.set_default(key, value);
    }

    fn ensure_attr(&mut self, key: &str, default: Value) -> Value {
        self.attrs.ensure(key, default)
    }

    fn remove_attr(&mut self, key: &str) {
        self.attrs.remove(key);
    }

    fn has_attr(&self, key: &str) -> bool {
        self.attrs.contains(key)
    }

    fn backend_supports(&self, key: &str) -> bool {
        self.backend.supports(key)
    }

    fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn next_random(&mut self) -> f64 {
        self.rng.gen()
    }
}

// ===================================================================================================
// PUBLIC API: Expression Evaluation Interface
// ===================================================================================================

/// Evaluates one tree node in the given context.
pub fn evaluate_node(expr: &AstNode, context: &mut EvalContext) -> Result<Value, RecipeError> {
    if context.depth >= context.max_depth {
        return Err(err_ctx!(Internal, "recursion limit exceeded", expr.span));
    }
    context.depth += 1;
    let result = evaluate_expr(expr, context);
    context.depth -= 1;
    result
}

fn evaluate_expr(expr: &AstNode, context: &mut EvalContext) -> Result<Value, RecipeError> {
    match expr.expr() {
        Expr::Nil(_) => Ok(Value::Nil),
        Expr::Bool(b, _) => Ok(Value::Bool(*b)),
        Expr::Number(n, _) => Ok(Value::Number(*n)),
        Expr::Str(s, _) => Ok(Value::Str(s.clone())),
        Expr::Sym(s, _) => Ok(Value::Sym(s.clone())),

        Expr::Ident(name, span) => context.locals.get(name).cloned().ok_or_else(|| {
            err_ctx!(
                Eval,
                format!("undefined identifier `{}`", name),
                *span,
                "identifiers must be recipe parameters or earlier assignments"
            )
        }),

        Expr::Call { target, args, .. } => evaluate_call(target, args, context),

        Expr::Tuple(items, _) => {
            let values = items
                .iter()
                .map(|item| evaluate_node(item, context))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Tuple(values))
        }

        Expr::Block(stmts, _) => {
            let mut result = Value::Nil;
            for stmt in stmts {
                result = evaluate_node(stmt, context)?;
            }
            Ok(result)
        }

        Expr::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            let cond = evaluate_node(condition, context)?;
            let Value::Bool(flag) = cond else {
                return Err(err_ctx!(
                    TypeError,
                    format!("if condition must be Bool, got {}", cond.type_name()),
                    condition.span
                ));
            };
            if flag {
                evaluate_node(then_branch, context)
            } else if let Some(other) = else_branch {
                evaluate_node(other, context)
            } else {
                Ok(Value::Nil)
            }
        }

        Expr::Assign { name, value, .. } => {
            let value = evaluate_node(value, context)?;
            context.locals.insert(name.clone(), value.clone());
            Ok(value)
        }

        // An attribute-set node only survives to evaluation inside call
        // arguments, which the rewriter never walks. There the arrow is
        // ordinary pair syntax: a 2-tuple of key symbol and value.
        Expr::AttrSet { key, value, .. } => {
            let Some(name) = key.expr().as_key_literal() else {
                return Err(err_ctx!(
                    Eval,
                    format!(
                        "attribute key must be a literal name, got `{}`",
                        key.expr().pretty()
                    ),
                    key.span
                ));
            };
            let name = name.to_string();
            let value = evaluate_node(value, context)?;
            Ok(Value::Tuple(vec![Value::Sym(name), value]))
        }

        Expr::Series(_, span) => Err(err_ctx!(
            Eval,
            "series block is only valid as a recipe statement",
            *span
        )),

        Expr::Param { .. } | Expr::Keywords(..) => Err(err_ctx!(
            Eval,
            "signature nodes cannot be evaluated at runtime",
            expr.span
        )),
    }
}

// ===================================================================================================
// INTERNAL HELPERS
// ===================================================================================================

/// Looks up and invokes a builtin by name, dispatching on its calling
/// convention.
fn evaluate_call(
    target: &AstNode,
    args: &[AstNode],
    context: &mut EvalContext,
) -> Result<Value, RecipeError> {
    let Expr::Ident(name, _) = target.expr() else {
        return Err(err_ctx!(
            Eval,
            format!(
                "call target must name a function, got `{}`",
                target.expr().pretty()
            ),
            target.span
        ));
    };
    let Some(builtin) = context.builtins.get(name).cloned() else {
        return Err(err_ctx!(
            Eval,
            format!("unknown function `{}`", name),
            target.span
        ));
    };

    match builtin {
        // The special form path, for builtins that control their own
        // evaluation (`series!` must run its body against the fork).
        Builtin::SpecialForm(special_fn) => special_fn(args, context),

        // Eagerly evaluated builtins (Pure and Stateful)
        Builtin::Stateful(stateful_fn) => {
            let values = evaluate_eager_args(args, context)?;
            stateful_fn(&values, context)
        }

        Builtin::Pure(pure_fn) => {
            let values = evaluate_eager_args(args, context)?;
            pure_fn(&values)
        }
    }
}

/// Evaluates arguments for eager builtins (Pure, Stateful), left to right.
fn evaluate_eager_args(
    args: &[AstNode],
    context: &mut EvalContext,
) -> Result<Vec<Value>, RecipeError> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(evaluate_node(arg, context)?);
    }
    Ok(values)
}
