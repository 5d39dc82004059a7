use log::trace;
use parking_lot::Mutex;

use super::{Completion, Engine, Var, op::OpNode};

/// Dependency-tracked engine executing operations on the rayon pool.
///
/// Submission enqueues the operation behind its vars and returns; granted
/// operations run on worker threads chosen by rayon. Per-var admission is
/// FIFO, so two writes scheduled in order are applied in that order and a
/// read scheduled after a write observes it.
pub struct ThreadedEngine {
    // Serializes the enqueue phase: admitting one operation on several
    // vars must not interleave with another admission, otherwise two
    // operations sharing two vars could each be queued first on one of
    // them and neither would ever run.
    order: Mutex<()>,
}

impl ThreadedEngine {
    /// Creates a new `ThreadedEngine`.
    ///
    /// # Returns
    /// A new `ThreadedEngine` instance.
    pub fn new() -> Self {
        Self {
            order: Mutex::new(()),
        }
    }
}

impl Engine for ThreadedEngine {
    fn schedule(&self, reads: &[Var], writes: &[Var], op: Box<dyn FnOnce() + Send>) -> Completion {
        let completion = Completion::new();
        let (reads, writes) = dedup_deps(reads, writes);
        trace!(
            "scheduling op with {} read dep(s), {} write dep(s)",
            reads.len(),
            writes.len()
        );

        let node = OpNode::new(reads, writes, op, completion.clone());
        if node.dep_count() == 0 {
            node.dispatch();
            return completion;
        }

        let order = self.order.lock();
        node.admit();
        drop(order);

        completion
    }
}

/// Collapses duplicate vars; a var that is both read and written counts
/// as a single write dependency.
fn dedup_deps(reads: &[Var], writes: &[Var]) -> (Vec<Var>, Vec<Var>) {
    let mut unique_writes: Vec<Var> = Vec::with_capacity(writes.len());
    for var in writes {
        if !unique_writes.iter().any(|w| w.same(var)) {
            unique_writes.push(var.clone());
        }
    }

    let mut unique_reads: Vec<Var> = Vec::with_capacity(reads.len());
    for var in reads {
        let seen = unique_writes.iter().any(|w| w.same(var))
            || unique_reads.iter().any(|r| r.same(var));
        if !seen {
            unique_reads.push(var.clone());
        }
    }

    (unique_reads, unique_writes)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_writes_apply_in_submission_order() {
        const OPS: usize = 64;

        let engine = ThreadedEngine::new();
        let var = Var::new();
        let applied = Arc::new(Mutex::new(Vec::new()));

        let mut completions = Vec::new();
        for i in 0..OPS {
            let applied = Arc::clone(&applied);
            let completion =
                engine.schedule(&[], &[var.clone()], Box::new(move || applied.lock().push(i)));
            completions.push(completion);
        }

        for completion in completions {
            completion.wait();
        }

        let applied = applied.lock();
        assert_eq!(*applied, (0..OPS).collect::<Vec<_>>());
    }

    #[test]
    fn test_read_observes_prior_write() {
        let engine = ThreadedEngine::new();
        let var = Var::new();
        let cell = Arc::new(Mutex::new(0));
        let observed = Arc::new(Mutex::new(Vec::new()));

        let writer = Arc::clone(&cell);
        engine.schedule(&[], &[var.clone()], Box::new(move || *writer.lock() = 1));

        for _ in 0..2 {
            let reader = Arc::clone(&cell);
            let observed = Arc::clone(&observed);
            engine.schedule(
                &[var.clone()],
                &[],
                Box::new(move || observed.lock().push(*reader.lock())),
            );
        }

        let writer = Arc::clone(&cell);
        engine.schedule(&[], &[var.clone()], Box::new(move || *writer.lock() = 2));

        let reader = Arc::clone(&cell);
        let late = Arc::clone(&observed);
        let completion = engine.schedule(
            &[var.clone()],
            &[],
            Box::new(move || late.lock().push(*reader.lock())),
        );
        completion.wait();

        assert_eq!(*observed.lock(), [1, 1, 2]);
    }

    #[test]
    fn test_dependency_free_op_runs() {
        let engine = ThreadedEngine::new();
        let completion = engine.schedule(&[], &[], Box::new(|| {}));
        completion.wait();
        assert!(completion.is_done());
    }

    #[test]
    fn test_var_in_reads_and_writes_collapses() {
        let engine = ThreadedEngine::new();
        let var = Var::new();
        let completion = engine.schedule(&[var.clone()], &[var.clone()], Box::new(|| {}));
        completion.wait();

        // the var must be released again for later ops
        let completion = engine.schedule(&[], &[var], Box::new(|| {}));
        completion.wait();
    }
}
