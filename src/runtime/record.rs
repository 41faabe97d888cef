//! One plottable series: an attribute snapshot paired with positional data.

use serde::{Deserialize, Serialize};

use crate::ast::value::Value;
use crate::runtime::attrs::AttrMap;

/// An immutable (attributes, positional data) pair. Created once, at the
/// moment a recipe body or series block completes; never mutated after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    attrs: AttrMap,
    args: Vec<Value>,
}

impl SeriesRecord {
    pub fn new(attrs: AttrMap, args: Vec<Value>) -> Self {
        SeriesRecord { attrs, args }
    }

    pub fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

/// Normalizes a body's trailing value into the record's positional argument
/// pack: a tuple spreads into its elements, anything else is a single
/// argument. A data vector (`List`) therefore stays one argument.
pub fn wrap_args(value: Value) -> Vec<Value> {
    match value {
        Value::Tuple(items) => items,
        other => vec![other],
    }
}

#[cfg(test)]
mod record_tests {
    use super::*;

    #[test]
    fn test_wrap_args_spreads_tuples_only() {
        let tuple = Value::Tuple(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(
            wrap_args(tuple),
            vec![Value::Number(1.0), Value::Number(2.0)]
        );

        let list = Value::List(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(
            wrap_args(list.clone()),
            vec![list]
        );

        assert_eq!(wrap_args(Value::Nil), vec![Value::Nil]);
    }
}
