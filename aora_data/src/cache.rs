use tokio::time::Instant;

use std::collections::HashMap;
use std::time::Duration;

use aora_core::{Post, User};

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Key of the whole-collection post listing.
pub(crate) const ALL_POSTS: &str = "allPosts";

pub(crate) fn user_key(account_id: &str) -> String {
    format!("user_{}", account_id)
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    /// `None` when the ttl reaches past what `Instant` can represent.
    expiry: Option<Instant>,
}

/// Key-value map where every entry expires a fixed duration after it was set.
/// Expired entries are only dropped when they are read.
#[derive(Debug, Clone)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: HashMap<String, Entry<V>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn set(&mut self, key: &str, value: V) {
        let expiry = Instant::now().checked_add(self.ttl);
        self.entries.insert(key.to_string(), Entry { value, expiry });
    }

    /// Value under `key` while `now < expiry`. Otherwise the entry is removed.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();
        let value = self
            .entries
            .get(key)
            .filter(|entry| entry.expiry.map_or(true, |expiry| now < expiry))
            .map(|entry| entry.value.clone());
        if value.is_none() {
            self.invalidate(key);
        }
        value
    }

    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AoraCache {
    /// listing key -> posts
    pub(crate) posts: TtlCache<Vec<Post>>,
    /// `user_{account_id}` -> user document
    pub(crate) users: TtlCache<User>,
}

impl AoraCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            posts: TtlCache::new(ttl),
            users: TtlCache::new(ttl),
        }
    }
}
