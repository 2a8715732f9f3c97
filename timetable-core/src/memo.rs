//! Single-slot memoization of derived views.
//!
//! A derived value is reused while the schedule and catalog are the same
//! allocations (pointer identity) and the selector key is equal. A new fetch
//! produces a new `Arc`, which invalidates the cache.

use std::sync::Arc;

use crate::period::PeriodCatalog;
use crate::schedule::CanonicalSchedule;

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub schedule: Arc<CanonicalSchedule>,
    pub catalog: Arc<PeriodCatalog>,
}

impl Snapshot {
    pub fn new(schedule: CanonicalSchedule, catalog: PeriodCatalog) -> Self {
        Self {
            schedule: Arc::new(schedule),
            catalog: Arc::new(catalog),
        }
    }

    pub fn with_schedule(&self, schedule: CanonicalSchedule) -> Self {
        Self {
            schedule: Arc::new(schedule),
            catalog: Arc::clone(&self.catalog),
        }
    }

    pub fn with_catalog(&self, catalog: PeriodCatalog) -> Self {
        Self {
            schedule: Arc::clone(&self.schedule),
            catalog: Arc::new(catalog),
        }
    }

    /// Same schedule and catalog allocations.
    pub fn same_as(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.schedule, &other.schedule) && Arc::ptr_eq(&self.catalog, &other.catalog)
    }
}

#[derive(Debug)]
pub struct Memo<K, V> {
    cached: Option<(Snapshot, K, Arc<V>)>,
    computes: u64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            cached: None,
            computes: 0,
        }
    }
}

impl<K: PartialEq + Clone, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<F>(&mut self, snapshot: &Snapshot, key: &K, compute: F) -> Arc<V>
    where
        F: FnOnce(&CanonicalSchedule, &PeriodCatalog) -> V,
    {
        if let Some((snap, k, v)) = &self.cached {
            if snap.same_as(snapshot) && k == key {
                return Arc::clone(v);
            }
        }

        let value = Arc::new(compute(&snapshot.schedule, &snapshot.catalog));
        self.computes += 1;
        self.cached = Some((snapshot.clone(), key.clone(), Arc::clone(&value)));
        value
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// How many times the value was actually computed.
    pub fn computes(&self) -> u64 {
        self.computes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::default_catalog;

    #[test]
    fn test_reuses_until_snapshot_or_key_changes() {
        let snap = Snapshot::new(CanonicalSchedule::default(), default_catalog());
        let mut memo: Memo<String, usize> = Memo::new();

        let a = memo.get_or_compute(&snap, &"Form 1".to_string(), |_, c| c.len());
        let b = memo.get_or_compute(&snap, &"Form 1".to_string(), |_, c| c.len());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(memo.computes(), 1);

        memo.get_or_compute(&snap, &"Form 2".to_string(), |_, c| c.len());
        assert_eq!(memo.computes(), 2);

        // Equal contents, new allocation: recomputed.
        let refetched = snap.with_schedule(CanonicalSchedule::default());
        memo.get_or_compute(&refetched, &"Form 2".to_string(), |_, c| c.len());
        assert_eq!(memo.computes(), 3);
    }
}
