//! Per-mission mutation serialization.
//!
//! The mission directory tree and its records are shared mutable state;
//! two concurrent renames (or a rename racing a delete) of the same
//! mission must not interleave at the filesystem level. Every mutating
//! operation holds the mission's lock for its duration.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

/// Registry of per-mission mutation locks, keyed by mission id.
#[derive(Debug, Default)]
pub struct MissionLockRegistry {
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl MissionLockRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// The lock for a mission, created on first use.
    pub fn lock_for(&self, mission_id: i64) -> Arc<Mutex<()>> {
        self.locks
            .entry(mission_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop a mission's lock entry after the mission is gone. In-flight
    /// holders keep their `Arc` alive until they finish.
    pub fn release(&self, mission_id: i64) {
        self.locks.remove(&mission_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_mission_same_lock() {
        let registry = MissionLockRegistry::new();
        let a = registry.lock_for(7);
        let b = registry.lock_for(7);
        assert!(Arc::ptr_eq(&a, &b));

        let other = registry.lock_for(8);
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[tokio::test]
    async fn test_release_forgets_mission() {
        let registry = MissionLockRegistry::new();
        let before = registry.lock_for(7);
        registry.release(7);
        let after = registry.lock_for(7);
        assert!(!Arc::ptr_eq(&before, &after));
    }
}
