// ==========================================
// Terra em Dia - per-entity lock registry
// ==========================================
// Serializes read-validate-write sequences on one machine or supply.
// Different ids never contend. A slot is removed once nobody holds or
// waits on it, so the map only contains ids with work in flight.
// ==========================================

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct EntityLocks {
    slots: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    // Both mutexes guard no data of their own; a poisoned lock is still usable.
    fn registry(&self) -> MutexGuard<'_, HashMap<i64, Arc<Mutex<()>>>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Runs `f` while holding the lock of entity `id`.
    pub fn with_lock<R>(&self, id: i64, f: impl FnOnce() -> R) -> R {
        let slot = {
            let mut slots = self.registry();
            Arc::clone(slots.entry(id).or_insert_with(|| Arc::new(Mutex::new(()))))
        };

        let result = {
            let _guard = slot.lock().unwrap_or_else(|e| e.into_inner());
            f()
        };

        drop(slot);
        let mut slots = self.registry();
        if slots.get(&id).map_or(false, |s| Arc::strong_count(s) == 1) {
            slots.remove(&id);
        }
        result
    }

    /// Number of ids currently holding a slot.
    pub fn active(&self) -> usize {
        self.registry().len()
    }
}
