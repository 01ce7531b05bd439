//! Per-target serialization of mount table mutations.

use std::collections::HashSet;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Inner {
    busy: Mutex<HashSet<String>>,
    released: Condvar,
}

/// Keyed lock table: at most one guard per target path exists at a time.
///
/// Entries are removed as soon as their guard drops, so the table only holds
/// paths with an operation in flight.
#[derive(Clone, Default)]
pub struct PathLocks {
    inner: Arc<Inner>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until `path` is free, then hold it until the guard drops.
    pub fn acquire(&self, path: &str) -> PathGuard {
        let mut busy = self.lock_set();
        while busy.contains(path) {
            busy = self
                .inner
                .released
                .wait(busy)
                .unwrap_or_else(PoisonError::into_inner);
        }
        busy.insert(path.to_string());

        PathGuard {
            inner: Arc::clone(&self.inner),
            path: path.to_string(),
        }
    }

    /// Number of paths currently held.
    pub fn held(&self) -> usize {
        self.lock_set().len()
    }

    // The set is only touched by insert/remove, so a poisoned lock still holds a consistent set.
    fn lock_set(&self) -> MutexGuard<'_, HashSet<String>> {
        self.inner
            .busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct PathGuard {
    inner: Arc<Inner>,
    path: String,
}

impl Drop for PathGuard {
    fn drop(&mut self) {
        let mut busy = self
            .inner
            .busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        busy.remove(&self.path);
        drop(busy);
        self.inner.released.notify_all();
    }
}
