use std::sync::Arc;

use crate::updater::{Assign, Updater};

/// Immutable store configuration, fixed at construction.
///
/// Fixing the merge behavior up front makes "configure before the first
/// registration" a construction-time contract instead of a runtime
/// ordering rule.
#[derive(Clone)]
pub struct StoreConfig {
    updater: Arc<dyn Updater>,
    aggregate: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            updater: Arc::new(Assign),
            aggregate: true,
        }
    }
}

impl StoreConfig {
    /// Creates the default configuration: [`Assign`] updater, aggregation
    /// enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the merge function.
    ///
    /// # Arguments
    /// * `updater` - Invoked per round when aggregation is enabled, per
    ///   push otherwise.
    pub fn updater(mut self, updater: impl Updater + 'static) -> Self {
        self.updater = Arc::new(updater);
        self
    }

    /// Toggles pre-merge summation of same-round contributions.
    pub fn aggregate(mut self, aggregate: bool) -> Self {
        self.aggregate = aggregate;
        self
    }

    pub(super) fn shared_updater(&self) -> Arc<dyn Updater> {
        Arc::clone(&self.updater)
    }

    pub(super) fn aggregates(&self) -> bool {
        self.aggregate
    }
}
