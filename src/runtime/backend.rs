//! The backend-support boundary.
//!
//! The engine never knows what a rendering backend can draw; it only asks
//! this predicate, one key at a time, when a `quiet` or `require` flagged
//! write (or keyword cleanup) runs.

/// Capability predicate of the rendering backend consuming the records.
pub trait Backend {
    /// Whether the backend understands the attribute `key`.
    fn supports(&self, key: &str) -> bool;

    /// Backend name for `require` failure messages.
    fn name(&self) -> &str;
}

/// Accepts every attribute key. The right choice when no real backend is
/// wired up yet, and the default in tests that are not about support checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveBackend;

impl Backend for PermissiveBackend {
    fn supports(&self, _key: &str) -> bool {
        true
    }

    fn name(&self) -> &str {
        "permissive"
    }
}
