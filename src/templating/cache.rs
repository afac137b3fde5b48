//! Process-lifetime cache of processed file content.
//!
//! Entries are keyed by file path plus modification time, so an edited file simply
//! misses the cache under its new key. Old entries are never evicted: the cache
//! lives as long as the engine that owns it.

use dashmap::DashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Identity of one version of a file: its path followed by its mtime in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(path: &Path, modified_millis: u64) -> Self {
        Self(format!("{}{}", path.display(), modified_millis))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Post-processed (not yet directive-resolved) file content shared by all loads.
///
/// Concurrent loads may race to insert the same key. Both writers hold identical
/// content for that key, so the last write wins without harm.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: DashMap<CacheKey, Arc<str>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached content for `key`, counted as a hit or a miss.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<str>> {
        match self.entries.get(key) {
            Some(content) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(content.value()))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn put(&self, key: CacheKey, content: impl Into<Arc<str>>) -> Arc<str> {
        let content = content.into();
        self.entries.insert(key, Arc::clone(&content));
        content
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since the cache was created.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits.load(Ordering::Relaxed), self.misses.load(Ordering::Relaxed))
    }
}

/// Cache keys already expanded in one resolution chain.
///
/// A fresh set is created for every top-level load and threaded through every
/// nested include, so a file version is inlined at most once per load.
#[derive(Debug, Default, Clone)]
pub struct SeenSet {
    keys: Vec<CacheKey>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key`. Returns `false` if it was already recorded.
    pub fn insert(&mut self, key: CacheKey) -> bool {
        if self.keys.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.keys.contains(key)
    }

    /// Keys in the order they were first seen.
    pub fn keys(&self) -> &[CacheKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
