use super::{Completion, Engine, Var};

/// Runs every operation synchronously at schedule time.
///
/// With a single scheduling thread every dependency is trivially satisfied
/// in submission order, so the vars are never consulted. Useful for
/// deterministic tests; not dependency-safe when scheduled onto from
/// several threads at once.
pub struct InlineEngine;

impl InlineEngine {
    /// Creates a new `InlineEngine`.
    ///
    /// # Returns
    /// A new `InlineEngine` instance.
    pub fn new() -> Self {
        Self
    }
}

impl Engine for InlineEngine {
    fn schedule(&self, _reads: &[Var], _writes: &[Var], op: Box<dyn FnOnce() + Send>) -> Completion {
        op();
        Completion::completed()
    }
}
