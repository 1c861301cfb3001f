//! Process-wide analytics counters.
//!
//! A fixed-key counter map behind a single mutex. The tracker is handed
//! to the engine by reference, so callers decide its scope (per process,
//! per test) instead of the crate owning a global.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Counter names the tracker recognizes. Increments against anything
/// else are silently dropped, so callers cannot mint counters at
/// runtime.
const COUNTERS: [&str; 3] = ["cpm_runs", "tasks_scored", "risk_evaluations"];

#[derive(Debug)]
pub struct MetricsTracker {
    counters: Mutex<BTreeMap<&'static str, u64>>,
}

impl MetricsTracker {
    /// A tracker with every known counter at zero.
    pub fn new() -> Self {
        let mut counters = BTreeMap::new();
        for name in COUNTERS {
            counters.insert(name, 0);
        }
        Self {
            counters: Mutex::new(counters),
        }
    }

    /// Add 1 to `name`.
    pub fn increment(&self, name: &str) {
        self.increment_by(name, 1);
    }

    /// Add `amount` to `name`.
    pub fn increment_by(&self, name: &str, amount: u64) {
        let mut counters = self.lock();
        if let Some(count) = counters.get_mut(name) {
            *count += amount;
        }
    }

    /// Point-in-time copy of all counters, ordered by name.
    pub fn snapshot(&self) -> BTreeMap<&'static str, u64> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<&'static str, u64>> {
        // The map holds plain integers, so a panic mid-update cannot
        // leave it inconsistent; take the guard back if poisoned.
        self.counters.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}
