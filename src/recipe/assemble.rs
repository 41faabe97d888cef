//! The code assembler: stitches an analyzed signature and a rewritten body
//! into a [`Recipe`] — the generated function.
//!
//! The assembled body has a fixed shape: for each keyword parameter, a
//! preamble statement binding a local via `attr/ensure!` (the local reflects
//! either the caller's prior value or the default, and the map now holds it
//! too); then a cleanup statement per keyword parameter removing keys the
//! backend rejects, so they do not leak into the map the caller receives;
//! then the rewritten user statements. The body's trailing value, when not
//! nil, becomes one final record built from the possibly further-mutated
//! top-level map, after any series-block records.

use std::collections::HashMap;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::ast::types::TypeExpr;
use crate::ast::value::Value;
use crate::ast::{AstNode, Expr};
use crate::builtins;
use crate::diagnostics::RecipeError;
use crate::recipe::rewrite::{self, emit_call, with_span};
use crate::recipe::signature::{self, RecipeSignature};
use crate::runtime::eval::{evaluate_node, EvalContext, MAX_EVAL_DEPTH};
use crate::runtime::record::{wrap_args, SeriesRecord};
use crate::runtime::{debug_enabled, AttrMap, Backend, StderrTrace, TraceSink};
use crate::{err_ctx, err_msg};

/// A generated data-extraction function: the analyzed signature plus the
/// fully rewritten and assembled body tree.
///
/// Built once per recipe definition by [`Recipe::define`]; invoked any
/// number of times, each invocation owning its own attribute map, locals,
/// and record list.
///
/// # Examples
///
/// ```rust
/// use seriate::ast::builder as b;
/// use seriate::ast::value::Value;
/// use seriate::recipe::Recipe;
/// use seriate::runtime::{AttrMap, PermissiveBackend};
///
/// let signature = b::signature("doubled", vec![b::param("xs")]);
/// let body = b::block(vec![
///     b::attr_default(b::ident("color"), b::sym("blue")),
///     b::ident("xs"),
/// ]);
/// let recipe = Recipe::define(&signature, &body).unwrap();
///
/// let mut attrs = AttrMap::new();
/// let data = Value::List(vec![Value::Number(1.0), Value::Number(2.0)]);
/// let records = recipe.invoke(&mut attrs, &[data], &PermissiveBackend).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(attrs.get("color"), Some(&Value::Sym("blue".to_string())));
/// ```
#[derive(Debug)]
pub struct Recipe {
    signature: RecipeSignature,
    body: AstNode,
}

impl Recipe {
    /// Transforms one recipe definition: analyzes the call-form signature,
    /// rewrites the body, and assembles the generated function.
    ///
    /// Errors here are transformation-time and fatal for this one
    /// definition; other recipes are unaffected.
    pub fn define(signature_node: &AstNode, body: &AstNode) -> Result<Recipe, RecipeError> {
        let signature = signature::analyze(signature_node)?;
        if body.expr().as_block().is_none() {
            return Err(err_ctx!(
                Malformed,
                format!(
                    "recipe body must be a statement block, got `{}`",
                    body.expr().pretty()
                ),
                body.span
            ));
        }
        let rewritten = rewrite::rewrite(body)?;

        let span = body.span;
        let mut stmts: Vec<AstNode> = Vec::with_capacity(2 * signature.keywords.len() + 1);

        // Preamble: bind each keyword parameter through the map.
        for kw in &signature.keywords {
            let key = with_span(Expr::Sym(kw.name.clone(), span), span);
            let ensure = emit_call("attr/ensure!", vec![key, kw.default.clone()], span);
            stmts.push(with_span(
                Expr::Assign {
                    name: kw.name.clone(),
                    value: Box::new(ensure),
                    span,
                },
                span,
            ));
        }
        // Cleanup: keyword keys the backend rejects must not leak to the
        // caller, even though the local stays bound for the body.
        for kw in &signature.keywords {
            let key = with_span(Expr::Sym(kw.name.clone(), span), span);
            let condition = emit_call("backend/supports?", vec![key.clone()], span);
            let del = emit_call("attr/del!", vec![key], span);
            stmts.push(with_span(
                Expr::If {
                    condition: Box::new(condition),
                    then_branch: Box::new(with_span(Expr::Nil(span), span)),
                    else_branch: Some(Box::new(del)),
                    span,
                },
                span,
            ));
        }

        match rewritten.expr() {
            Expr::Block(body_stmts, _) => stmts.extend(body_stmts.iter().cloned()),
            _ => {
                return Err(err_msg!(
                    Internal,
                    "rewriter did not return a statement block"
                ));
            }
        }

        Ok(Recipe {
            signature,
            body: with_span(Expr::Block(stmts, span), span),
        })
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn signature(&self) -> &RecipeSignature {
        &self.signature
    }

    /// The assembled body tree, for inspection and tests.
    pub fn body(&self) -> &AstNode {
        &self.body
    }

    /// The ordered type list this recipe dispatches under.
    pub fn dispatch_key(&self) -> Vec<TypeExpr> {
        self.signature.dispatch_key()
    }

    /// Scores how specifically this recipe matches the argument values, or
    /// `None` when it does not match. Arguments are matched positionally;
    /// unfilled trailing parameters must all carry defaults.
    pub fn match_score(&self, args: &[Value]) -> Option<u32> {
        let positionals = &self.signature.positionals;
        if args.len() > positionals.len() {
            return None;
        }
        let mut total = 0;
        for (param, arg) in positionals.iter().zip(args) {
            if let Some(ty) = &param.ty {
                total += ty.match_score(&arg.type_expr())?;
            }
        }
        for param in &positionals[args.len()..] {
            param.default.as_ref()?;
        }
        Some(total)
    }

    /// Invokes the generated function, tracing to stderr when the debug
    /// flag is on.
    pub fn invoke(
        &self,
        attrs: &mut AttrMap,
        args: &[Value],
        backend: &dyn Backend,
    ) -> Result<Vec<SeriesRecord>, RecipeError> {
        self.invoke_traced(attrs, args, backend, &mut StderrTrace)
    }

    /// Invokes the generated function against the given attribute map and
    /// positional arguments, returning the ordered record list:
    /// series-block records in evaluation order, the main-body record (if
    /// any) last.
    pub fn invoke_traced(
        &self,
        attrs: &mut AttrMap,
        args: &[Value],
        backend: &dyn Backend,
        trace: &mut dyn TraceSink,
    ) -> Result<Vec<SeriesRecord>, RecipeError> {
        if debug_enabled() {
            let rendered = args
                .iter()
                .map(|arg| arg.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            trace.emit(&format!("{}({})", self.signature.name, rendered));
        }

        let positionals = &self.signature.positionals;
        if args.len() > positionals.len() {
            return Err(err_msg!(
                Eval,
                "{}: expected at most {} positional argument(s), got {}",
                self.signature.name,
                positionals.len(),
                args.len()
            ));
        }

        let mut records = Vec::new();
        let mut rng = Xoshiro256StarStar::from_entropy();
        let trailing = {
            let mut context = EvalContext {
                attrs,
                backend,
                builtins: builtins::canonical(),
                records: &mut records,
                locals: HashMap::new(),
                rng: &mut rng,
                max_depth: MAX_EVAL_DEPTH,
                depth: 0,
            };
            // Bind positionals left to right; omitted trailing arguments
            // fall back to their defaults, evaluated with the earlier
            // parameters already bound.
            for (index, param) in positionals.iter().enumerate() {
                let value = if let Some(arg) = args.get(index) {
                    arg.clone()
                } else if let Some(default) = &param.default {
                    evaluate_node(default, &mut context)?
                } else {
                    return Err(err_msg!(
                        Eval,
                        "{}: missing argument for parameter `{}`",
                        self.signature.name,
                        param.name
                    ));
                };
                context.locals.insert(param.name.clone(), value);
            }
            evaluate_node(&self.body, &mut context)?
        };

        if !trailing.is_nil() {
            records.push(SeriesRecord::new(attrs.clone(), wrap_args(trailing)));
        }
        Ok(records)
    }
}
