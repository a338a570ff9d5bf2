//! Minimum-interval gate keyed by subject.
//!
//! Each monitor owns its own tracker. A key that has never been accepted
//! always passes. Rejected events leave the stored timestamp alone, so a
//! burst of rejected events cannot keep pushing the window forward.

use chrono::{DateTime, Local, TimeDelta};
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DebounceTracker<K> {
    min_interval: TimeDelta,
    last_accepted: HashMap<K, DateTime<Local>>,
}

impl<K: Eq + Hash> DebounceTracker<K> {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval: TimeDelta::from_std(min_interval).unwrap_or(TimeDelta::MAX),
            last_accepted: HashMap::new(),
        }
    }

    /// Whether an event for `key` at `now` passes the gate. Does not record.
    pub fn should_accept(&self, key: &K, now: DateTime<Local>) -> bool {
        match self.last_accepted.get(key) {
            None => true,
            Some(last) => now.signed_duration_since(*last) >= self.min_interval,
        }
    }

    /// Store `now` as the last accepted time for `key`.
    pub fn record(&mut self, key: K, now: DateTime<Local>) {
        self.last_accepted.insert(key, now);
    }

    /// Check and, on acceptance, record in one step.
    pub fn try_accept(&mut self, key: K, now: DateTime<Local>) -> bool {
        if self.should_accept(&key, now) {
            self.record(key, now);
            true
        } else {
            false
        }
    }

    pub fn last_accepted(&self, key: &K) -> Option<DateTime<Local>> {
        self.last_accepted.get(key).copied()
    }
}
