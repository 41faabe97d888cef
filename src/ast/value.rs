use std::fmt;

use im::HashMap;
use serde::{Deserialize, Serialize};

use crate::ast::types::TypeExpr;

/// Represents a runtime value in the recipe engine.
///
/// The type is closed: `Custom` is the one open arm, a typed domain object
/// (the thing recipes dispatch on). `Tuple` is a positional-argument pack
/// and is distinct from `List`, so a data vector returned by a recipe body
/// is wrapped as a single argument, never splatted.
///
/// # Examples
///
/// ```rust
/// use seriate::ast::value::Value;
/// let n = Value::Number(3.14);
/// assert_eq!(n.type_name(), "Number");
/// let s = Value::Sym("red".to_string());
/// assert_eq!(s.type_name(), "Sym");
/// let nil = Value::default();
/// assert!(nil.is_nil());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
    Sym(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Map(HashMap<String, Value>),
    Custom(CustomValue),
}

/// A typed domain object: a runtime type tag plus named fields.
///
/// # Examples
///
/// ```rust
/// use seriate::ast::types::TypeExpr;
/// use seriate::ast::value::{CustomValue, Value};
/// let wave = CustomValue::new(TypeExpr::new("Wave"))
///     .with_field("points", Value::List(vec![Value::Number(1.0)]));
/// assert_eq!(wave.field("points"), Some(&Value::List(vec![Value::Number(1.0)])));
/// assert_eq!(wave.field("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomValue {
    pub ty: TypeExpr,
    pub fields: HashMap<String, Value>,
}

impl CustomValue {
    pub fn new(ty: TypeExpr) -> Self {
        CustomValue {
            ty,
            fields: HashMap::new(),
        }
    }

    /// Adds a field, builder-style.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl Value {
    /// Returns the type name of the value as a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seriate::ast::value::Value;
    /// let v = Value::Bool(true);
    /// assert_eq!(v.type_name(), "Bool");
    /// ```
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::Str(_) => "Str",
            Value::Sym(_) => "Sym",
            Value::List(_) => "List",
            Value::Tuple(_) => "Tuple",
            Value::Map(_) => "Map",
            Value::Custom(_) => "Custom",
        }
    }

    /// Returns the runtime type expression used by dispatch. Built-in kinds
    /// report their head name; a `Custom` value reports its own tag,
    /// parameters included.
    pub fn type_expr(&self) -> TypeExpr {
        match self {
            Value::Custom(c) => c.ty.clone(),
            other => TypeExpr::new(other.type_name()),
        }
    }

    /// Returns true if the value is Nil.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns the contained number if this is a Number value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seriate::ast::value::Value;
    /// let v = Value::Number(2.0);
    /// assert_eq!(v.as_number(), Some(2.0));
    /// let v2 = Value::Str("nope".to_string());
    /// assert_eq!(v2.as_number(), None);
    /// ```
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the contained bool if this is a Bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the symbol or string text for key-like values.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Value::Sym(s) => Some(s),
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the contained items if this is a List value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Display formatting helpers
    // ------------------------------------------------------------------------

    fn fmt_seq(f: &mut fmt::Formatter<'_>, items: &[Value], open: &str, close: &str) -> fmt::Result {
        write!(f, "{}", open)?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "{}", close)
    }

    // Sorted by key so the rendering is stable under im's iteration order.
    fn fmt_map(f: &mut fmt::Formatter<'_>, map: &HashMap<String, Value>) -> fmt::Result {
        let mut entries: Vec<_> = map.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        write!(f, "{{")?;
        for (i, (k, v)) in entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", k, v)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Str(s) => write!(f, "{}", s),
            Value::Sym(s) => write!(f, ":{}", s),
            Value::List(items) => Value::fmt_seq(f, items, "[", "]"),
            Value::Tuple(items) => Value::fmt_seq(f, items, "(", ")"),
            Value::Map(map) => Value::fmt_map(f, map),
            Value::Custom(c) => {
                write!(f, "{} ", c.ty)?;
                Value::fmt_map(f, &c.fields)
            }
        }
    }
}
