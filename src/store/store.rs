use std::{collections::HashMap, sync::Arc};

use log::{debug, trace};
use parking_lot::Mutex;

use super::{Key, Result, StoreConfig, StoreError, slot::Slot};
use crate::{
    backend::{Backend, Device, LocalBackend},
    engine::{Completion, Engine, ThreadedEngine},
    tensor::Tensor,
};

/// Key-value coordination core for shared optimization state.
///
/// A `KvStore` binds integer keys to store-owned accumulators. Callers
/// push contributions and pull merged values; the configured updater
/// decides how contributions merge. Push and pull never block: they
/// schedule operations on the attached engine and ordering comes
/// exclusively from the declared read/write dependencies, which gives
/// per-caller FIFO pushes and pulls that observe every prior push of the
/// same caller.
///
/// The store is detached until [`KvStore::init_devices`] (or
/// [`KvStore::attach`]) binds an execution substrate.
pub struct KvStore {
    config: StoreConfig,
    state: Mutex<Option<Active>>,
}

struct Active {
    engine: Arc<dyn Engine>,
    backend: Box<dyn Backend>,
    round_size: usize,
    slots: HashMap<Key, Arc<Slot>>,
}

impl KvStore {
    /// Creates a detached store; `config` is fixed for its lifetime.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            state: Mutex::new(None),
        }
    }

    /// Attaches the default local substrate and binds `devices`.
    ///
    /// The device count defines the aggregation round size: one
    /// contribution per device completes a round. An empty list binds a
    /// single implicit device.
    ///
    /// # Arguments
    /// * `devices` - The local devices contributing to each round.
    ///
    /// # Returns
    /// An error if a substrate is already attached.
    pub fn init_devices(&self, devices: &[Device]) -> Result<()> {
        self.attach(
            Arc::new(ThreadedEngine::new()),
            Box::new(LocalBackend::new()),
            devices,
        )
    }

    /// Attaches a custom substrate.
    ///
    /// # Arguments
    /// * `engine` - The dependency-tracked engine operations schedule on.
    /// * `backend` - The group membership provider.
    /// * `devices` - The local devices contributing to each round.
    ///
    /// # Returns
    /// An error if a substrate is already attached.
    pub fn attach(
        &self,
        engine: Arc<dyn Engine>,
        backend: Box<dyn Backend>,
        devices: &[Device],
    ) -> Result<()> {
        let mut state = self.state.lock();
        if state.is_some() {
            return Err(StoreError::AlreadyAttached);
        }

        let round_size = devices.len().max(1);
        debug!("attaching substrate, round size {round_size}");
        *state = Some(Active {
            engine,
            backend,
            round_size,
            slots: HashMap::new(),
        });

        Ok(())
    }

    /// Registers `key` and schedules the initialization of its
    /// accumulator from `value`.
    ///
    /// The accumulator is store-owned storage copied from the caller's
    /// value, never an alias of it. A key must be registered exactly once
    /// before any push or pull.
    ///
    /// # Arguments
    /// * `key` - The key to register.
    /// * `value` - The initial value; its size becomes the key's size.
    ///
    /// # Returns
    /// An error if the store is detached or the key is taken.
    pub fn init(&self, key: Key, value: &Tensor) -> Result<()> {
        let mut state = self.state.lock();
        let active = state.as_mut().ok_or(StoreError::Detached)?;
        if active.slots.contains_key(&key) {
            return Err(StoreError::AlreadyRegistered(key));
        }

        let slot = Arc::new(Slot::new(value.len()));
        trace!("registering key {key} with {} value(s)", value.len());

        let src = value.clone();
        let dst = Arc::clone(&slot);
        active.engine.schedule(
            &[value.var().clone()],
            &[slot.var().clone()],
            Box::new(move || dst.init_from(&src.read())),
        );

        active.slots.insert(key, slot);
        Ok(())
    }

    /// Schedules the contribution of `value` to `key`.
    ///
    /// Returns as soon as the operation is submitted. Pushes from one
    /// caller on one key apply in submission order; pushes from different
    /// callers interleave arbitrarily. With aggregation enabled the
    /// contribution joins the current round and the updater runs once per
    /// round; otherwise the updater runs once per push.
    ///
    /// # Arguments
    /// * `key` - A registered key.
    /// * `value` - The contribution; must match the registered size.
    ///
    /// # Returns
    /// The completion of the scheduled push, or an error if the store is
    /// detached, the key unknown, or the size wrong.
    pub fn push(&self, key: Key, value: &Tensor) -> Result<Completion> {
        let state = self.state.lock();
        let active = state.as_ref().ok_or(StoreError::Detached)?;
        let slot = active.slots.get(&key).ok_or(StoreError::UnknownKey(key))?;
        if value.len() != slot.size() {
            return Err(StoreError::SizeMismatch {
                key,
                expected: slot.size(),
                found: value.len(),
            });
        }

        let updater = self.config.shared_updater();
        let src = value.clone();
        let dst = Arc::clone(slot);

        let completion = if self.config.aggregates() {
            let round_size = active.round_size;
            slot.note_scheduled(round_size);
            active.engine.schedule(
                &[value.var().clone()],
                &[slot.var().clone()],
                Box::new(move || dst.absorb(&src.read(), round_size, updater.as_ref())),
            )
        } else {
            active.engine.schedule(
                &[value.var().clone()],
                &[slot.var().clone()],
                Box::new(move || dst.merge(&src.read(), updater.as_ref())),
            )
        };

        trace!("push scheduled for key {key}");
        Ok(completion)
    }

    /// Schedules a read of `key`'s merged value into `out`.
    ///
    /// Returns a handle immediately; the caller waits on it explicitly
    /// before reading `out`. Once resolved, `out` reflects the
    /// accumulator after every push previously issued by this caller on
    /// `key`; an incomplete aggregation round is flushed first so those
    /// pushes are incorporated. No ordering is guaranteed relative to
    /// concurrent pushes from other callers.
    ///
    /// # Arguments
    /// * `key` - A registered key.
    /// * `out` - A pre-allocated output matching the registered size.
    ///
    /// # Returns
    /// The completion of the scheduled pull, or an error if the store is
    /// detached, the key unknown, or the size wrong.
    pub fn pull(&self, key: Key, out: &Tensor) -> Result<Completion> {
        let state = self.state.lock();
        let active = state.as_ref().ok_or(StoreError::Detached)?;
        let slot = active.slots.get(&key).ok_or(StoreError::UnknownKey(key))?;
        if out.len() != slot.size() {
            return Err(StoreError::SizeMismatch {
                key,
                expected: slot.size(),
                found: out.len(),
            });
        }

        if self.config.aggregates() && slot.take_scheduled() > 0 {
            let updater = self.config.shared_updater();
            let dst = Arc::clone(slot);
            active.engine.schedule(
                &[],
                &[slot.var().clone()],
                Box::new(move || dst.flush(updater.as_ref())),
            );
        }

        let src = Arc::clone(slot);
        let sink = out.clone();
        let completion = active.engine.schedule(
            &[slot.var().clone()],
            &[out.var().clone()],
            Box::new(move || src.fill(&mut sink.write())),
        );

        trace!("pull scheduled for key {key}");
        Ok(completion)
    }

    /// Releases every slot and detaches the substrate.
    ///
    /// Operations already scheduled run to completion against their
    /// captured state. Afterwards the store behaves as freshly
    /// constructed: devices must be bound and keys re-registered before
    /// reuse. Stopping a detached store is a no-op.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if let Some(active) = state.take() {
            debug!("stopping store, releasing {} slot(s)", active.slots.len());
        }
    }

    /// Rank of this node in its group; `0` while detached.
    pub fn get_rank(&self) -> usize {
        self.state.lock().as_ref().map_or(0, |a| a.backend.rank())
    }

    /// The number of nodes in this group; `1` while detached.
    pub fn get_group_size(&self) -> usize {
        self.state
            .lock()
            .as_ref()
            .map_or(1, |a| a.backend.group_size())
    }

    /// Updater applications observed for `key` so far.
    ///
    /// Reads the counter directly; pending operations may still advance
    /// it. Wait on a pull of the key first for a stable view.
    pub fn generation(&self, key: Key) -> Result<u64> {
        let state = self.state.lock();
        let active = state.as_ref().ok_or(StoreError::Detached)?;
        let slot = active.slots.get(&key).ok_or(StoreError::UnknownKey(key))?;
        Ok(slot.generation())
    }
}
