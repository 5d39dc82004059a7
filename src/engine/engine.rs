use super::{Completion, Var};

/// An asynchronous dependency-tracked execution substrate.
///
/// Operations are submitted with the [`Var`]s they read and write;
/// implementations must admit operations per var in submission order,
/// may share read access between concurrent operations, and must grant a
/// write only when no other operation holds that var. Submission never
/// blocks: the returned [`Completion`] is the only suspension point.
pub trait Engine: Send + Sync {
    /// Schedules `op` behind the given dependencies.
    ///
    /// # Arguments
    /// * `reads` - Vars the operation reads; shared access.
    /// * `writes` - Vars the operation mutates; exclusive access.
    /// * `op` - The operation body, run once all dependencies are granted.
    ///
    /// # Returns
    /// A handle resolving once `op` has run.
    fn schedule(&self, reads: &[Var], writes: &[Var], op: Box<dyn FnOnce() + Send>) -> Completion;
}
