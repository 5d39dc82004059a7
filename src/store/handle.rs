use std::{ops::Deref, sync::Arc};

use tokio::task;

use super::{Key, KvStore, Result};
use crate::tensor::Tensor;

/// The async interface to interact with a shared [`KvStore`].
///
/// It bridges the async runtime with the blocking engine waits: each
/// method schedules the operation and parks the task until it resolves.
/// Requires a multi-threaded runtime.
#[derive(Clone)]
pub struct StoreHandle(Arc<KvStore>);

impl Deref for StoreHandle {
    type Target = KvStore;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl StoreHandle {
    /// Creates a new `StoreHandle`.
    ///
    /// # Arguments
    /// * `store` - The underlying store.
    ///
    /// # Returns
    /// A new `StoreHandle` instance.
    pub fn new(store: KvStore) -> Self {
        Self(Arc::new(store))
    }

    /// Async call to `KvStore::push` that waits for the contribution to
    /// be applied.
    ///
    /// # Arguments
    /// * `key` - A registered key.
    /// * `value` - The contribution; must match the registered size.
    pub async fn push(&self, key: Key, value: &Tensor) -> Result<()> {
        let completion = self.0.push(key, value)?;
        task::block_in_place(|| completion.wait());
        Ok(())
    }

    /// Async call to `KvStore::pull` that waits for `out` to hold the
    /// merged value.
    ///
    /// # Arguments
    /// * `key` - A registered key.
    /// * `out` - A pre-allocated output matching the registered size.
    pub async fn pull(&self, key: Key, out: &Tensor) -> Result<()> {
        let completion = self.0.pull(key, out)?;
        task::block_in_place(|| completion.wait());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{backend::Device, store::StoreConfig};

    #[tokio::test(flavor = "multi_thread")]
    async fn test_async_push_pull_flow() {
        let store = KvStore::new(StoreConfig::new());
        store.init_devices(&[Device(0)]).unwrap();
        store.init(0, &Tensor::from_slice(&[1., 2.])).unwrap();

        let handle = StoreHandle::new(store);
        handle.push(0, &Tensor::from_slice(&[3., 4.])).await.unwrap();

        let out = Tensor::zeros(2);
        handle.pull(0, &out).await.unwrap();
        assert_eq!(out.to_vec(), [3., 4.]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_clones_target_the_same_store() {
        let store = KvStore::new(StoreConfig::new());
        store.init_devices(&[Device(0)]).unwrap();
        store.init(0, &Tensor::zeros(1)).unwrap();

        let handle = StoreHandle::new(store);
        let writer = handle.clone();
        writer.push(0, &Tensor::from_slice(&[8.])).await.unwrap();

        let out = Tensor::zeros(1);
        handle.pull(0, &out).await.unwrap();
        assert_eq!(out.to_vec(), [8.]);
    }
}
