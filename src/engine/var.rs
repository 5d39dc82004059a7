use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;

use super::op::OpNode;

/// A dependency node tracked by the execution engine.
///
/// Every shared resource that scheduled operations touch owns one `Var`.
/// Access is granted in submission order: consecutive readers may share
/// the var, a writer is admitted only once it is alone at the head of the
/// queue. Clones refer to the same node.
#[derive(Clone)]
pub struct Var(Arc<Mutex<VarQueue>>);

struct VarQueue {
    pending: VecDeque<Entry>,
    active_reads: usize,
    active_write: bool,
}

struct Entry {
    node: Arc<OpNode>,
    write: bool,
}

impl Var {
    /// Creates a fresh, unowned dependency node.
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(VarQueue {
            pending: VecDeque::new(),
            active_reads: 0,
            active_write: false,
        })))
    }

    /// Whether `self` and `other` refer to the same node.
    pub fn same(&self, other: &Var) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Admits an operation on this var, granting it immediately when it
    /// would be at the head of the queue, queueing it otherwise.
    pub(super) fn admit(&self, node: &Arc<OpNode>, write: bool) {
        let mut queue = self.0.lock();

        let grantable = if write {
            queue.pending.is_empty() && !queue.active_write && queue.active_reads == 0
        } else {
            queue.pending.is_empty() && !queue.active_write
        };

        if grantable {
            if write {
                queue.active_write = true;
            } else {
                queue.active_reads += 1;
            }
            drop(queue);
            node.grant();
        } else {
            queue.pending.push_back(Entry {
                node: Arc::clone(node),
                write,
            });
        }
    }

    /// Releases a previously granted access and admits whatever became
    /// grantable at the head of the queue.
    pub(super) fn release(&self, write: bool) {
        let mut queue = self.0.lock();

        if write {
            queue.active_write = false;
        } else {
            queue.active_reads -= 1;
        }

        let mut granted = Vec::new();
        loop {
            let head_writes = match queue.pending.front() {
                Some(entry) => entry.write,
                None => break,
            };

            if head_writes {
                if !queue.active_write && queue.active_reads == 0 {
                    if let Some(entry) = queue.pending.pop_front() {
                        queue.active_write = true;
                        granted.push(entry.node);
                    }
                }
                break;
            }

            if queue.active_write {
                break;
            }

            if let Some(entry) = queue.pending.pop_front() {
                queue.active_reads += 1;
                granted.push(entry.node);
            }
        }
        drop(queue);

        for node in granted {
            node.grant();
        }
    }
}
