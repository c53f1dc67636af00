#![forbid(unsafe_code)]

//! Portrait load cache.
//!
//! One [`ImageCache`] is created at startup and handed to whoever needs it;
//! clones share the same set. Entries are added when a portrait fetch
//! succeeds and are never evicted for the life of the process. Tests build a
//! fresh instance instead of sharing ambient state.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared set of image URLs known to have loaded.
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    loaded: Arc<RwLock<HashSet<String>>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url)
    }

    /// Record a successful load. Returns `false` if it was already cached.
    pub fn insert(&self, url: impl Into<String>) -> bool {
        self.loaded
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into())
    }

    pub fn len(&self) -> usize {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct fetchable URLs from `urls` that are not cached yet.
    pub fn pending<'a, I>(&self, urls: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let loaded = self.loaded.read().unwrap_or_else(PoisonError::into_inner);
        let mut seen = HashSet::new();
        urls.into_iter()
            .filter(|u| is_fetchable(u) && !loaded.contains(*u) && seen.insert(*u))
            .map(str::to_string)
            .collect()
    }
}

/// Only absolute http(s) URLs are worth fetching.
pub fn is_fetchable(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
