use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::SizeMismatchErr;
use crate::engine::{Completion, Engine, Var};

/// A shared mutable cell of `f32` values participating in engine
/// dependency tracking.
///
/// Clones are cheap and refer to the same buffer and the same [`Var`].
/// Consumers that care about ordering access the buffer only from inside
/// operations scheduled with the tensor's var as a dependency.
#[derive(Clone)]
pub struct Tensor {
    len: usize,
    data: Arc<RwLock<Box<[f32]>>>,
    var: Var,
}

impl Tensor {
    /// Creates a tensor holding a copy of `values`.
    pub fn from_slice(values: &[f32]) -> Self {
        Self {
            len: values.len(),
            data: Arc::new(RwLock::new(values.to_vec().into_boxed_slice())),
            var: Var::new(),
        }
    }

    /// Creates a zero-filled tensor of `len` values.
    pub fn zeros(len: usize) -> Self {
        Self {
            len,
            data: Arc::new(RwLock::new(vec![0.; len].into_boxed_slice())),
            var: Var::new(),
        }
    }

    /// The number of values in the tensor; fixed at creation.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tensor holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The tensor's dependency node.
    pub fn var(&self) -> &Var {
        &self.var
    }

    /// Whether `self` and `other` refer to the same buffer.
    pub fn same(&self, other: &Tensor) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Shared access to the buffer, for scheduled operation bodies.
    pub fn read(&self) -> RwLockReadGuard<'_, Box<[f32]>> {
        self.data.read()
    }

    /// Exclusive access to the buffer, for scheduled operation bodies.
    pub fn write(&self) -> RwLockWriteGuard<'_, Box<[f32]>> {
        self.data.write()
    }

    /// Copies the current buffer contents out.
    ///
    /// Reads the cell directly, bypassing dependency tracking; callers
    /// wait on the relevant [`Completion`] first.
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.read().to_vec()
    }
}

/// Schedules a copy of `src` into `dst`.
///
/// # Arguments
/// * `engine` - The substrate to schedule on.
/// * `src` - The tensor read from.
/// * `dst` - The tensor written to; must match `src` in size.
///
/// # Returns
/// The completion of the scheduled copy, or `SizeMismatchErr` when the
/// sizes differ.
pub fn copy_from_to(
    engine: &dyn Engine,
    src: &Tensor,
    dst: &Tensor,
) -> Result<Completion, SizeMismatchErr> {
    if src.len() != dst.len() {
        return Err(SizeMismatchErr);
    }

    // Copying a tensor onto itself is a no-op, but still yields a handle
    // ordered behind the pending writers.
    if src.same(dst) {
        return Ok(engine.schedule(&[], &[dst.var().clone()], Box::new(|| {})));
    }

    let from = src.clone();
    let to = dst.clone();
    let completion = engine.schedule(
        &[src.var().clone()],
        &[dst.var().clone()],
        Box::new(move || to.write().copy_from_slice(&from.read())),
    );

    Ok(completion)
}
