use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use parking_lot::Mutex;

use super::{Completion, Var};

/// A scheduled operation waiting on its dependency grants.
///
/// The node counts outstanding grants; whichever grant brings the count
/// to zero dispatches the body onto the worker pool.
pub(super) struct OpNode {
    missing: AtomicUsize,
    body: Mutex<Option<Box<dyn FnOnce() + Send>>>,
    completion: Completion,
    reads: Vec<Var>,
    writes: Vec<Var>,
}

impl OpNode {
    /// Creates a node waiting on every var in `reads` and `writes`.
    pub(super) fn new(
        reads: Vec<Var>,
        writes: Vec<Var>,
        body: Box<dyn FnOnce() + Send>,
        completion: Completion,
    ) -> Arc<Self> {
        Arc::new(Self {
            missing: AtomicUsize::new(reads.len() + writes.len()),
            body: Mutex::new(Some(body)),
            completion,
            reads,
            writes,
        })
    }

    /// The number of dependency grants this node waits on.
    pub(super) fn dep_count(&self) -> usize {
        self.reads.len() + self.writes.len()
    }

    /// Enqueues the node on all of its vars.
    ///
    /// Must happen atomically with respect to other admissions, so the
    /// caller serializes invocations; see `ThreadedEngine::schedule`.
    pub(super) fn admit(self: &Arc<Self>) {
        for var in &self.reads {
            var.admit(self, false);
        }
        for var in &self.writes {
            var.admit(self, true);
        }
    }

    /// Records one dependency grant, dispatching once all are in.
    pub(super) fn grant(self: &Arc<Self>) {
        if self.missing.fetch_sub(1, Ordering::AcqRel) == 1 {
            Arc::clone(self).dispatch();
        }
    }

    /// Hands the node to the worker pool.
    pub(super) fn dispatch(self: Arc<Self>) {
        rayon::spawn(move || self.run());
    }

    fn run(&self) {
        let body = self.body.lock().take();
        if let Some(body) = body {
            body();
        }

        self.completion.complete();

        for var in &self.reads {
            var.release(false);
        }
        for var in &self.writes {
            var.release(true);
        }
    }
}
