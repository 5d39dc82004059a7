use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

/// Waitable handle for a scheduled operation.
///
/// Scheduling never blocks; a caller that needs the result suspends
/// explicitly through [`Completion::wait`]. Once scheduled, the operation
/// runs to completion and cannot be revoked.
#[derive(Clone, Debug)]
pub struct Completion(Arc<State>);

#[derive(Debug)]
struct State {
    done: Mutex<bool>,
    cond: Condvar,
}

impl Completion {
    /// Creates a handle for an operation that has not run yet.
    ///
    /// # Returns
    /// A new pending `Completion` instance.
    pub fn new() -> Self {
        Self(Arc::new(State {
            done: Mutex::new(false),
            cond: Condvar::new(),
        }))
    }

    /// Creates a handle for an operation that already ran.
    ///
    /// # Returns
    /// A resolved `Completion` instance.
    pub fn completed() -> Self {
        Self(Arc::new(State {
            done: Mutex::new(true),
            cond: Condvar::new(),
        }))
    }

    /// Marks the operation as finished and wakes every waiter.
    ///
    /// Called by `Engine` implementations once the operation body has run.
    pub fn complete(&self) {
        let mut done = self.0.done.lock();
        *done = true;
        self.0.cond.notify_all();
    }

    /// Blocks the calling thread until the operation has run.
    pub fn wait(&self) {
        let mut done = self.0.done.lock();
        while !*done {
            self.0.cond.wait(&mut done);
        }
    }

    /// Whether the operation has already run.
    pub fn is_done(&self) -> bool {
        *self.0.done.lock()
    }
}
