//! Client-wide thread cache.
//!
//! One [`ThreadCache`] is shared by every manager of a client. Managers never
//! copy entities out of it; they read a view filtered by parent channel.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::threads::{SharedThread, ThreadChannel};

#[derive(Debug, Default)]
pub struct ThreadCache {
    threads: RwLock<IndexMap<String, SharedThread>>,
}

impl ThreadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<SharedThread> {
        self.threads.read().get(id).map(Arc::clone)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.threads.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.threads.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.read().is_empty()
    }

    /// Inserts a thread unless its identifier is already present.
    ///
    /// Returns the cached instance, which is the existing one on a repeat
    /// insert. An existing entry is left untouched.
    pub fn insert(&self, thread: ThreadChannel) -> SharedThread {
        let mut threads = self.threads.write();
        Arc::clone(
            threads
                .entry(thread.id.clone())
                .or_insert_with(|| Arc::new(RwLock::new(thread))),
        )
    }

    /// Materializes a thread observed in a response.
    ///
    /// An existing entity is refreshed in place when `cache` is set. Without
    /// `cache`, a detached copy of it carrying the new payload is returned and
    /// the cached entity is left alone. A new thread is only stored when
    /// `cache` is set. Refreshes are last-write-wins by arrival.
    pub fn add(&self, thread: ThreadChannel, cache: bool) -> SharedThread {
        if let Some(existing) = self.get(&thread.id) {
            if cache {
                existing.write().patch(thread);
                return existing;
            }
            let mut detached = existing.read().clone();
            detached.patch(thread);
            return Arc::new(RwLock::new(detached));
        }
        if cache {
            self.insert(thread)
        } else {
            Arc::new(RwLock::new(thread))
        }
    }

    /// Removes a thread. Eviction is left to the embedding client.
    pub fn remove(&self, id: &str) -> Option<SharedThread> {
        self.threads.write().shift_remove(id)
    }

    /// Threads whose parent is `parent_id`, in insertion order.
    pub fn filter_parent(&self, parent_id: &str) -> IndexMap<String, SharedThread> {
        self.threads
            .read()
            .iter()
            .filter(|(_, thread)| thread.read().parent_id.as_deref() == Some(parent_id))
            .map(|(id, thread)| (id.clone(), Arc::clone(thread)))
            .collect()
    }
}
