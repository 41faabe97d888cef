//! Runtime support for generated recipes: the attribute map, series records,
//! the backend boundary, the tree evaluator, the dispatch registry, and the
//! process-wide debug toggle.

use std::sync::atomic::{AtomicBool, Ordering};

pub mod attrs;
pub mod backend;
pub mod eval;
pub mod record;
pub mod registry;

pub use attrs::AttrMap;
pub use backend::{Backend, PermissiveBackend};
pub use eval::EvalContext;
pub use record::{wrap_args, SeriesRecord};
pub use registry::RecipeRegistry;

// ============================================================================
// DEBUG TOGGLE
// ============================================================================

static DEBUG_RECIPES: AtomicBool = AtomicBool::new(false);

/// Turns invocation tracing on or off for the whole process. Every generated
/// function reads this at entry; last writer wins, no stronger protocol.
pub fn set_debug(enabled: bool) {
    DEBUG_RECIPES.store(enabled, Ordering::Relaxed);
}

/// Whether invocation tracing is currently enabled.
pub fn debug_enabled() -> bool {
    DEBUG_RECIPES.load(Ordering::Relaxed)
}

// ============================================================================
// TRACE SINK
// ============================================================================

/// Destination for invocation trace lines, so tracing is testable and
/// injectable.
pub trait TraceSink {
    fn emit(&mut self, line: &str);
}

/// Writes trace lines to stderr. The default sink.
#[derive(Debug, Default)]
pub struct StderrTrace;

impl TraceSink for StderrTrace {
    fn emit(&mut self, line: &str) {
        eprintln!("{}", line);
    }
}

/// Collects trace lines in memory.
#[derive(Debug, Default)]
pub struct BufferTrace {
    pub lines: Vec<String>,
}

impl TraceSink for BufferTrace {
    fn emit(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
