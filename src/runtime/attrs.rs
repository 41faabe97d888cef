//! The attribute map: symbolic keys to values, mutated in place by generated
//! recipe code.
//!
//! Backed by `im::HashMap`, so [`AttrMap::fork`] — the per-series copy — is a
//! cheap persistent clone, and later mutations on either side never cross.

use im::HashMap;
use serde::{Deserialize, Serialize};

use crate::ast::value::Value;

/// Mapping from attribute key to value. Keys are unique; iteration order is
/// unspecified.
///
/// # Examples
///
/// ```rust
/// use seriate::ast::value::Value;
/// use seriate::runtime::AttrMap;
/// let mut attrs = AttrMap::new();
/// attrs.set("color", Value::Sym("red".to_string()));
/// attrs.set_default("color", Value::Sym("blue".to_string()));
/// assert_eq!(attrs.get("color"), Some(&Value::Sym("red".to_string())));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttrMap {
    entries: HashMap<String, Value>,
}

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Unconditional write. The `force` spelling and `:=` land here.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Insert-if-absent. The plain `-->` spelling lands here: a value the
    /// caller already supplied wins.
    pub fn set_default(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if !self.entries.contains_key(&key) {
            self.entries.insert(key, value);
        }
    }

    /// Insert-if-absent that returns the value now present. The keyword
    /// preamble binds its local to this.
    pub fn ensure(&mut self, key: &str, default: Value) -> Value {
        if let Some(existing) = self.entries.get(key) {
            return existing.clone();
        }
        self.entries.insert(key.to_string(), default.clone());
        default
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Full independent copy for a series block. Structural sharing makes
    /// this O(1); writes after the fork stay on their own side.
    pub fn fork(&self) -> AttrMap {
        self.clone()
    }
}

#[cfg(test)]
mod attrs_tests {
    use super::*;

    fn sym(s: &str) -> Value {
        Value::Sym(s.to_string())
    }

    #[test]
    fn test_set_default_preserves_existing() {
        let mut attrs = AttrMap::new();
        attrs.set("color", sym("red"));
        attrs.set_default("color", sym("blue"));
        assert_eq!(attrs.get("color"), Some(&sym("red")));
        attrs.set_default("shape", sym("auto"));
        assert_eq!(attrs.get("shape"), Some(&sym("auto")));
    }

    #[test]
    fn test_ensure_returns_present_value() {
        let mut attrs = AttrMap::new();
        attrs.set("n", Value::Number(7.0));
        assert_eq!(attrs.ensure("n", Value::Number(10.0)), Value::Number(7.0));
        assert_eq!(attrs.ensure("m", Value::Number(10.0)), Value::Number(10.0));
        assert_eq!(attrs.get("m"), Some(&Value::Number(10.0)));
    }

    #[test]
    fn test_fork_isolates_both_sides() {
        let mut parent = AttrMap::new();
        parent.set("color", sym("red"));
        let mut child = parent.fork();

        child.set("color", sym("green"));
        child.set("fill", sym("green"));
        parent.set("width", Value::Number(2.0));

        assert_eq!(parent.get("color"), Some(&sym("red")));
        assert!(!parent.contains("fill"));
        assert!(!child.contains("width"));
        assert_eq!(child.get("color"), Some(&sym("green")));
    }
}
