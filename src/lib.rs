//! Coordination of mutable per-key optimization state.
//!
//! Callers register keys, push contributions and pull merged values; a
//! pluggable [`Updater`] decides how contributions merge into each key's
//! accumulator. Every tensor access happens inside operations scheduled on a
//! dependency-tracked [`Engine`], which is what provides the ordering
//! guarantees: per-caller FIFO pushes and read-your-own-writes pulls, with
//! no ordering locks in the store itself.

mod backend;
mod engine;
mod store;
mod tensor;
mod updater;

#[cfg(test)]
mod test;

pub use backend::{Backend, Device, LocalBackend};
pub use engine::{Completion, Engine, InlineEngine, ThreadedEngine, Var};
pub use store::{Key, KvStore, Result, StoreConfig, StoreError, StoreHandle};
pub use tensor::{SizeMismatchErr, Tensor, copy_from_to};
pub use updater::{Assign, Sgd, Updater};
