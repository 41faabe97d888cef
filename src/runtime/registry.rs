//! The dispatch registry: generated recipes, keyed by their positional
//! parameter types, resolved most-specific-match against the runtime values
//! of an invocation.
//!
//! The transformation engine does not implement dispatch semantics beyond
//! this explicit table; it only emits recipes that participate in it.
//!
//! # Resolution policy
//!
//! Every candidate whose parameters all match the supplied arguments (and
//! whose unfilled trailing parameters all carry defaults) is scored by
//! summing [`TypeExpr::match_score`] across arguments; the highest total
//! wins. On a tie, the most recently registered recipe wins. Registering a
//! recipe under an already-present dispatch key replaces the earlier one.
//!
//! # Thread Safety
//! This type is **not** thread-safe. To share between threads, wrap in a
//! `std::sync::Mutex` or `RwLock`.

use crate::ast::value::Value;
use crate::diagnostics::RecipeError;
use crate::err_msg;
use crate::recipe::Recipe;
use crate::runtime::attrs::AttrMap;
use crate::runtime::backend::Backend;
use crate::runtime::record::SeriesRecord;

/// Registry of generated recipes, resolved by argument types.
///
/// # Examples
///
/// ```rust
/// use seriate::ast::builder as b;
/// use seriate::ast::types::TypeExpr;
/// use seriate::recipe::Recipe;
/// use seriate::runtime::RecipeRegistry;
///
/// let signature = b::signature("wave", vec![b::typed_param("w", TypeExpr::new("Wave"))]);
/// let body = b::block(vec![b::ident("w")]);
/// let mut registry = RecipeRegistry::new();
/// registry.register(Recipe::define(&signature, &body).unwrap());
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Default)]
pub struct RecipeRegistry {
    recipes: Vec<Recipe>,
}

impl RecipeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a recipe, replacing any earlier recipe with an identical
    /// dispatch key.
    pub fn register(&mut self, recipe: Recipe) {
        let key = recipe.dispatch_key();
        if let Some(existing) = self.recipes.iter_mut().find(|r| r.dispatch_key() == key) {
            *existing = recipe;
        } else {
            self.recipes.push(recipe);
        }
    }

    /// Finds the most specific recipe matching the argument values, or
    /// `None` when nothing matches.
    pub fn resolve(&self, args: &[Value]) -> Option<&Recipe> {
        let mut best: Option<(u32, &Recipe)> = None;
        for recipe in &self.recipes {
            let Some(score) = recipe.match_score(args) else {
                continue;
            };
            // `>=` would be wrong here: later entries win ties, and that is
            // exactly what replacing on a non-strictly-greater best gives.
            match best {
                Some((best_score, _)) if best_score > score => {}
                _ => best = Some((score, recipe)),
            }
        }
        best.map(|(_, recipe)| recipe)
    }

    /// Resolves and invokes in one step. A miss is a `Dispatch` error
    /// naming the argument types.
    pub fn apply(
        &self,
        attrs: &mut AttrMap,
        args: &[Value],
        backend: &dyn Backend,
    ) -> Result<Vec<SeriesRecord>, RecipeError> {
        let recipe = self.resolve(args).ok_or_else(|| {
            let types = args
                .iter()
                .map(|arg| arg.type_expr().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            err_msg!(Dispatch, "no recipe matches argument types ({})", types)
        })?;
        recipe.invoke(attrs, args, backend)
    }

    /// Names of all registered recipes, in registration order.
    pub fn list(&self) -> Vec<&str> {
        self.recipes.iter().map(|recipe| recipe.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
