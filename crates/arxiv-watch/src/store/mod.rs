//! Seen-set storage.
//!
//! The discovery engine never touches the filesystem directly. It reads and
//! writes through [`SeenStore`], so the backend can be a JSON file
//! ([`JsonFileStore`]), memory ([`MemoryStore`]) or anything else that can hold
//! a set of strings.

mod file;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub use file::JsonFileStore;

use crate::error::{StateError, StateResult};
use crate::models::SeenSet;

/// Durable key-set storage for emitted ids.
pub trait SeenStore: Send + Sync {
    /// Read the full set. A store that has never been saved returns an empty set.
    fn load(&self) -> StateResult<SeenSet>;

    /// Replace the stored set with `seen`, all at once.
    fn save(&self, seen: &SeenSet) -> StateResult<()>;

    /// Take exclusive access for one read-modify-write cycle.
    ///
    /// The returned guard releases the lock when dropped. Backends without
    /// contention return an inert guard.
    fn lock(&self) -> StateResult<StoreLock> {
        Ok(StoreLock::unlocked())
    }
}

impl<T: SeenStore + ?Sized> SeenStore for &T {
    fn load(&self) -> StateResult<SeenSet> {
        (**self).load()
    }

    fn save(&self, seen: &SeenSet) -> StateResult<()> {
        (**self).save(seen)
    }

    fn lock(&self) -> StateResult<StoreLock> {
        (**self).lock()
    }
}

/// Guard for exclusive access to a [`SeenStore`].
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct StoreLock {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl StoreLock {
    /// A guard that holds nothing.
    pub fn unlocked() -> Self {
        Self { release: None }
    }

    /// A guard that runs `release` when dropped.
    pub fn on_release(release: impl FnOnce() + Send + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for StoreLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreLock").field("held", &self.release.is_some()).finish()
    }
}

/// In-memory [`SeenStore`]. Clones share the same set.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    seen: Arc<Mutex<SeenSet>>,
    locked: Arc<AtomicBool>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `ids`.
    #[must_use]
    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::default();
        *store.seen.lock().unwrap_or_else(PoisonError::into_inner) = ids.into_iter().collect();
        store
    }

    /// Copy of the current contents.
    #[must_use]
    pub fn snapshot(&self) -> SeenSet {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of completed saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SeenStore for MemoryStore {
    fn load(&self) -> StateResult<SeenSet> {
        Ok(self.snapshot())
    }

    fn save(&self, seen: &SeenSet) -> StateResult<()> {
        *self.seen.lock().unwrap_or_else(PoisonError::into_inner) = seen.clone();
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }

    fn lock(&self) -> StateResult<StoreLock> {
        if self.locked.swap(true, Ordering::AcqRel) {
            return Err(StateError::Locked { path: "<memory>".into() });
        }
        let flag = Arc::clone(&self.locked);
        Ok(StoreLock::on_release(move || flag.store(false, Ordering::Release)))
    }
}
