//! Type expressions for dispatch.
//!
//! A [`TypeExpr`] names a runtime type, optionally parameterized
//! (`Wave` or `Wave{Smooth}`). Signatures annotate parameters with them,
//! dispatch keys are ordered lists of them, and `Value::Custom` carries one
//! as its runtime tag.

use std::fmt;

use serde::{Deserialize, Serialize};

const ANY: &str = "Any";

/// A type expression: a head name plus zero or more type parameters.
///
/// # Examples
///
/// ```rust
/// use seriate::ast::types::TypeExpr;
/// let wave = TypeExpr::parameterized("Wave", vec![TypeExpr::new("Smooth")]);
/// assert_eq!(wave.to_string(), "Wave{Smooth}");
/// assert!(TypeExpr::any().is_any());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeExpr {
    pub name: String,
    pub params: Vec<TypeExpr>,
}

impl TypeExpr {
    pub fn new(name: impl Into<String>) -> Self {
        TypeExpr {
            name: name.into(),
            params: vec![],
        }
    }

    pub fn parameterized(name: impl Into<String>, params: Vec<TypeExpr>) -> Self {
        TypeExpr {
            name: name.into(),
            params,
        }
    }

    /// The unannotated, least-specific type. Matches every value.
    pub fn any() -> Self {
        TypeExpr::new(ANY)
    }

    pub fn is_any(&self) -> bool {
        self.name == ANY && self.params.is_empty()
    }

    /// Scores how specifically this annotation matches a runtime type, or
    /// `None` when it does not match at all.
    ///
    /// `Any` matches everything at score 0. A bare name matches any runtime
    /// type with the same head, parameters ignored, at score 1. A
    /// parameterized name requires the same head and recursively matching
    /// parameters, scoring 2 plus the parameter scores. Dispatch resolution
    /// sums scores across arguments and picks the highest total.
    pub fn match_score(&self, actual: &TypeExpr) -> Option<u32> {
        if self.is_any() {
            return Some(0);
        }
        if self.name != actual.name {
            return None;
        }
        if self.params.is_empty() {
            return Some(1);
        }
        if self.params.len() != actual.params.len() {
            return None;
        }
        let mut score = 2;
        for (want, have) in self.params.iter().zip(actual.params.iter()) {
            score += want.match_score(have)?;
        }
        Some(score)
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.params.is_empty() {
            return Ok(());
        }
        write!(f, "{{")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, "}}")
    }
}
