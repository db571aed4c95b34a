//! In-memory cache of fetched collections.
//!
//! Entries are keyed by a [`QueryKey`] (resource name plus parameters).
//! Mutations never patch entries in place: callers invalidate the affected
//! resources and the next read refetches.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: &'static str,
    pub params: Vec<String>,
}

impl QueryKey {
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, value: impl Into<String>) -> Self {
        self.params.push(value.into());
        self
    }
}

struct Entry<V> {
    value: V,
    fetched_at: Instant,
}

pub struct QueryCache<V> {
    entries: HashMap<QueryKey, Entry<V>>,
    ttl: Duration,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// A fresh value for `key`. Entries older than the TTL count as missing.
    pub fn get(&self, key: &QueryKey) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &QueryKey, now: Instant) -> Option<V> {
        self.entries
            .get(key)
            .filter(|e| now.saturating_duration_since(e.fetched_at) < self.ttl)
            .map(|e| e.value.clone())
    }

    pub fn insert(&mut self, key: QueryKey, value: V) {
        self.entries.insert(
            key,
            Entry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop every entry of `resource`, whatever its parameters.
    /// Returns how many entries were removed.
    pub fn invalidate(&mut self, resource: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.resource != resource);
        let removed = before - self.entries.len();
        debug!("Invalidated {removed} cached entries for {resource}");
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
