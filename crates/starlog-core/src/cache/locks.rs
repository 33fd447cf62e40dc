//! Per-key async mutexes.

use super::CacheKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<CacheKey, Arc<AsyncMutex<()>>>;

/// Lazily created async mutex per cache key.
///
/// A key's mutex lives only while some task holds or waits on it; releasing a
/// guard drops every idle entry, so the map is bounded by in-flight work.
///
/// Callers that hold more than one key must take the repository key before
/// [`CacheKey::Saved`].
#[derive(Default)]
pub struct KeyLocks {
    locks: Arc<Mutex<LockMap>>,
}

/// Exclusive access to one key, released on drop.
pub struct KeyGuard {
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<Mutex<LockMap>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn lock(&self, key: &CacheKey) -> KeyGuard {
        let mut held = KeyGuard {
            guard: None,
            locks: self.locks.clone(),
        };
        let mutex = {
            let mut locks = lock_map(&self.locks);
            locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        held.guard = Some(mutex.lock_owned().await);
        held
    }

    /// Number of keys currently held or awaited.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        lock_map(&self.locks).len()
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map references an idle mutex. Sweeping all of them also
        // collects entries left by lock futures cancelled mid-wait.
        lock_map(&self.locks).retain(|_, mutex| Arc::strong_count(mutex) > 1);
    }
}

fn lock_map(locks: &Mutex<LockMap>) -> MutexGuard<'_, LockMap> {
    locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
