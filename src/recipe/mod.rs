//! The transformation engine: signature analysis, attribute rewriting,
//! series-block extraction, and assembly of the generated function.
//!
//! The pipeline is a pure tree-to-tree pass run once per recipe definition:
//! [`signature::analyze`] decomposes the call-form signature,
//! [`rewrite::rewrite`] turns attribute-set statements into conditional
//! attribute-map operations (delegating series blocks to [`series::extract`]),
//! and [`Recipe::define`] stitches the rewritten body together with the
//! keyword preamble and cleanup scaffolding.

pub mod assemble;
pub mod rewrite;
pub mod series;
pub mod signature;

pub use assemble::Recipe;
pub use signature::{KeywordParam, PositionalParam, RecipeSignature};
