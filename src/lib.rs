pub use crate::diagnostics::{to_error_source, ErrorContext, ErrorType, RecipeError};
pub use crate::recipe::Recipe;
pub use crate::runtime::{debug_enabled, set_debug};

pub mod ast;
pub mod builtins;
pub mod diagnostics;
pub mod recipe;
pub mod runtime;
