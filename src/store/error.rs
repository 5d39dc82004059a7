use std::{
    error::Error,
    fmt::{self, Display},
};

use super::Key;

/// The specific result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Contract violations surfaced synchronously by store operations.
///
/// Every variant is detected at call time, before anything reaches the
/// execution engine; nothing is scheduled on the error path. Failures of
/// the substrate itself surface through the affected `Completion`, not
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// No execution substrate is attached: the store was never bound to
    /// devices, or was stopped.
    Detached,

    /// The store already has a substrate attached.
    AlreadyAttached,

    /// The key was registered before.
    AlreadyRegistered(Key),

    /// The key was never registered.
    UnknownKey(Key),

    /// A pushed or pulled buffer does not match the registered size.
    SizeMismatch {
        /// The key the operation targeted.
        key: Key,
        /// The size registered for the key.
        expected: usize,
        /// The size of the offending buffer.
        found: usize,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Detached => f.write_str("store error: no substrate attached, bind devices first"),
            StoreError::AlreadyAttached => f.write_str("store error: a substrate is already attached"),
            StoreError::AlreadyRegistered(key) => {
                write!(f, "store error: key {key} is already registered")
            }
            StoreError::UnknownKey(key) => write!(f, "store error: key {key} was never registered"),
            StoreError::SizeMismatch {
                key,
                expected,
                found,
            } => {
                write!(
                    f,
                    "store error: key {key} holds {expected} values, the provided buffer holds {found}"
                )
            }
        }
    }
}

impl Error for StoreError {}
