/// Defines how a pushed contribution merges into a key's accumulator.
pub trait Updater: Send + Sync {
    /// Merges `contribution` into `accum`.
    ///
    /// Both slices have the key's registered size; the store checks
    /// lengths before anything is scheduled.
    ///
    /// # Arguments
    /// * `contribution` - The pushed value, or the summed round when
    ///   aggregation is enabled.
    /// * `accum` - The stored value to merge into.
    fn merge(&self, contribution: &[f32], accum: &mut [f32]);
}
