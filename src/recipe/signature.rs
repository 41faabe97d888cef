//! The signature analyzer: decomposes a call-form recipe signature into a
//! dispatch target, positional parameters, and keyword parameters with
//! defaults.
//!
//! Runs once per recipe definition, at transformation time. Every failure
//! here is fatal for that one definition and surfaces as a
//! `RecipeError::Signature` before any generated function exists.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ast::types::TypeExpr;
use crate::ast::{AstNode, Expr};
use crate::diagnostics::RecipeError;
use crate::{err_ctx, err_msg};

/// One positional parameter: a name with its optional type annotation and
/// optional default expression, carried through untouched from the
/// signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionalParam {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub default: Option<AstNode>,
}

/// One `name = default` keyword parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordParam {
    pub name: String,
    pub default: AstNode,
}

/// The analyzed shape of a recipe signature. Derived once per definition;
/// not a runtime entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSignature {
    pub name: String,
    /// The first positional parameter's annotation, type parameters
    /// included, or `Any` when unannotated. This is what the recipe
    /// dispatches on.
    pub target: TypeExpr,
    pub positionals: Vec<PositionalParam>,
    pub keywords: Vec<KeywordParam>,
}

impl RecipeSignature {
    /// The ordered type list the recipe is registered under: one entry per
    /// positional parameter, `Any` where unannotated.
    pub fn dispatch_key(&self) -> Vec<TypeExpr> {
        self.positionals
            .iter()
            .map(|param| param.ty.clone().unwrap_or_else(TypeExpr::any))
            .collect()
    }
}

/// Decomposes a call-form signature node into a [`RecipeSignature`].
///
/// The node must be `name(params…)`. A keyword sub-list, when present, must
/// be the first parameter; its entries are extracted in order and removed
/// from the positional list. Positional defaults may only appear on a
/// trailing run of parameters.
pub fn analyze(signature: &AstNode) -> Result<RecipeSignature, RecipeError> {
    let Expr::Call { target, args, span } = signature.expr() else {
        return Err(err_ctx!(
            Signature,
            "recipe signature must be call-form",
            signature.span,
            "write the signature as `name(params…)`"
        ));
    };
    let Expr::Ident(name, _) = target.expr() else {
        return Err(err_ctx!(
            Signature,
            format!(
                "recipe name must be an identifier, got `{}`",
                target.expr().pretty()
            ),
            target.span
        ));
    };

    let mut keywords = Vec::new();
    let mut positionals = Vec::new();
    for (index, param) in args.iter().enumerate() {
        match param.expr() {
            Expr::Keywords(pairs, _) if index == 0 => {
                keywords = pairs
                    .iter()
                    .map(|kw| KeywordParam {
                        name: kw.name.clone(),
                        default: kw.default.clone(),
                    })
                    .collect();
            }
            Expr::Keywords(..) => {
                return Err(err_ctx!(
                    Signature,
                    "keyword sub-list must be the first parameter or absent",
                    param.span
                ));
            }
            Expr::Ident(param_name, _) => positionals.push(PositionalParam {
                name: param_name.clone(),
                ty: None,
                default: None,
            }),
            Expr::Param {
                name: param_name,
                ty,
                default,
                ..
            } => positionals.push(PositionalParam {
                name: param_name.clone(),
                ty: ty.clone(),
                default: default.as_deref().cloned(),
            }),
            other => {
                return Err(err_ctx!(
                    Signature,
                    format!("malformed parameter `{}`", other.pretty()),
                    param.span
                ));
            }
        }
    }

    if positionals.is_empty() {
        return Err(err_ctx!(
            Signature,
            "nothing to dispatch on",
            *span,
            "a recipe needs at least one positional parameter besides the implicit attribute map"
        ));
    }

    // Defaults only on a trailing run, so invocation can bind by position.
    let mut seen_default = false;
    for param in &positionals {
        if param.default.is_some() {
            seen_default = true;
        } else if seen_default {
            return Err(err_msg!(
                Signature,
                "positional parameter `{}` without a default follows a defaulted one",
                param.name
            ));
        }
    }

    let mut seen = HashSet::new();
    for param_name in positionals
        .iter()
        .map(|p| &p.name)
        .chain(keywords.iter().map(|k| &k.name))
    {
        if !seen.insert(param_name.as_str()) {
            return Err(err_msg!(
                Signature,
                "duplicate parameter name `{}`",
                param_name
            ));
        }
    }

    let target = positionals[0].ty.clone().unwrap_or_else(TypeExpr::any);
    Ok(RecipeSignature {
        name: name.clone(),
        target,
        positionals,
        keywords,
    })
}
