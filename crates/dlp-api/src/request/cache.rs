//! Memoized JSON responses keyed by [`generate_cache_key`](super::generate_cache_key).
//!
//! Entries hold the serialized JSON body. An entry is served only while it is
//! younger than the TTL and was built from the current store revision.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry {
    body: Arc<str>,
    revision: u64,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn get(&self, key: &str, revision: u64, now: Instant) -> Option<Arc<str>> {
        let entry = self.entries.get(key)?;
        if entry.revision != revision || now.saturating_duration_since(entry.stored_at) >= self.ttl {
            return None;
        }
        Some(Arc::clone(&entry.body))
    }

    pub fn insert(&mut self, key: String, body: Arc<str>, revision: u64, now: Instant) {
        if !self.is_enabled() {
            return;
        }
        let ttl = self.ttl;
        self.entries
            .retain(|_, e| e.revision == revision && now.saturating_duration_since(e.stored_at) < ttl);
        self.entries.insert(
            key,
            CacheEntry {
                body,
                revision,
                stored_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_ttl_and_revision() {
        let mut cache = ResponseCache::new(Duration::from_secs(30));
        let now = Instant::now();
        cache.insert("vaults:".to_string(), Arc::from(r#"{"total":1}"#), 7, now);
        assert_eq!(
            cache.get("vaults:", 7, now + Duration::from_secs(5)).as_deref(),
            Some(r#"{"total":1}"#)
        );
    }

    #[test]
    fn test_miss_on_new_revision_or_expiry() {
        let mut cache = ResponseCache::new(Duration::from_secs(30));
        let now = Instant::now();
        cache.insert("vaults:".to_string(), Arc::from("[]"), 7, now);
        assert!(cache.get("vaults:", 8, now).is_none());
        assert!(cache.get("vaults:", 7, now + Duration::from_secs(30)).is_none());
    }

    #[test]
    fn test_insert_purges_stale_revisions() {
        let mut cache = ResponseCache::new(Duration::from_secs(30));
        let now = Instant::now();
        cache.insert("a".to_string(), Arc::from("1"), 1, now);
        cache.insert("b".to_string(), Arc::from("2"), 2, now);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_disables() {
        let mut cache = ResponseCache::new(Duration::ZERO);
        cache.insert("a".to_string(), Arc::from("1"), 1, Instant::now());
        assert!(cache.is_empty());
    }
}
