use std::hash::Hash;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

/// Self-expiring set: a key is suppressed for one `ttl` window after its
/// first sighting.
///
/// Expiry is checked lazily on every access and by an explicit `sweep`, so
/// no per-key timer is ever scheduled or cancelled.
pub struct TimedSet<K> {
    ttl: Duration,
    expiry: FxHashMap<K, Instant>,
}

impl<K: Eq + Hash + Clone> TimedSet<K> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            expiry: FxHashMap::default(),
        }
    }

    /// `true` for the first sighting of `key` in a window (and arms the
    /// window), `false` while the window is open.
    pub fn should_process(&mut self, key: &K) -> bool {
        self.should_process_at(key, Instant::now())
    }

    pub(super) fn should_process_at(&mut self, key: &K, now: Instant) -> bool {
        match self.expiry.get(key) {
            Some(&until) if now < until => false,
            _ => {
                // Absent or expired (an event right at expiry counts as new)
                self.expiry.insert(key.clone(), now + self.ttl);
                true
            }
        }
    }

    /// Drop every expired entry.
    pub fn sweep(&mut self) {
        self.sweep_at(Instant::now());
    }

    pub(super) fn sweep_at(&mut self, now: Instant) {
        self.expiry.retain(|_, until| now < *until);
    }

    #[cfg(test)]
    pub fn contains(&self, key: &K) -> bool {
        self.expiry
            .get(key)
            .is_some_and(|until| Instant::now() < *until)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.expiry.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.expiry.is_empty()
    }
}
