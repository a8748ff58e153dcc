//! In-process strategy. Records every save and registration; can be switched to fail.

use crate::models::{LiveMatch, Tournament};
use crate::persistence::{MatchRegistry, PersistenceError, SnapshotStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    snapshots: HashMap<String, Tournament>,
    saves: usize,
    live_matches: Vec<LiveMatch>,
}

/// Cloning shares the underlying storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    failing: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a snapshot without counting it as a save.
    pub fn insert(&self, id: impl Into<String>, snapshot: Tournament) {
        self.lock().snapshots.insert(id.into(), snapshot);
    }

    pub fn snapshot(&self, id: &str) -> Option<Tournament> {
        self.lock().snapshots.get(id).cloned()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    pub fn live_matches(&self) -> Vec<LiveMatch> {
        self.lock().live_matches.clone()
    }

    /// While set, every operation fails with [`PersistenceError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), PersistenceError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(PersistenceError::Unavailable("memory store switched off".into()))
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves plain data behind; keep using it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotStore for MemoryStore {
    async fn load(&self, id: &str) -> Result<Option<Tournament>, PersistenceError> {
        self.check()?;
        Ok(self.snapshot(id))
    }

    async fn save(&self, id: &str, snapshot: &Tournament) -> Result<(), PersistenceError> {
        self.check()?;
        let mut inner = self.lock();
        inner.snapshots.insert(id.to_string(), snapshot.clone());
        inner.saves += 1;
        Ok(())
    }

    async fn clear(&self, id: &str) -> Result<(), PersistenceError> {
        self.check()?;
        self.lock().snapshots.remove(id);
        Ok(())
    }
}

impl MatchRegistry for MemoryStore {
    async fn register(&self, record: &LiveMatch) -> Result<(), PersistenceError> {
        self.check()?;
        self.lock().live_matches.push(record.clone());
        Ok(())
    }
}
