// src/resolver/cache.rs

//! Memo of requirement resolutions keyed on the canonical requirement text
//!
//! Many packages carry byte-identical requirements (a shared library
//! SONAME, `/bin/sh`), so the lookup and version filter run once per
//! distinct string. Self-exclusion depends on the requirer and is applied
//! by the caller after the cache.

use crate::package::PkgId;
use std::collections::HashMap;
use std::sync::Arc;

/// A memoized resolution, independent of the requiring package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cached {
    /// No package provides the name
    NotFound,
    /// Satisfied without a providing package
    Builtin,
    /// Providers exist but none satisfies the version
    Mismatch,
    /// Version-filtered providers, preferred first
    Matches(Arc<[PkgId]>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

#[derive(Debug, Default)]
pub struct ReqCache {
    entries: HashMap<String, Cached>,
    hits: usize,
    misses: usize,
}

impl ReqCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached resolution for `key`, computing it on first use
    pub fn get_or_insert_with<F>(&mut self, key: String, compute: F) -> Cached
    where
        F: FnOnce() -> Cached,
    {
        if let Some(cached) = self.entries.get(&key) {
            self.hits += 1;
            return cached.clone();
        }

        self.misses += 1;
        let cached = compute();
        self.entries.insert(key, cached.clone());
        cached
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computes_once() {
        let mut cache = ReqCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            let got = cache.get_or_insert_with("libfoo.so.1".to_string(), || {
                calls += 1;
                Cached::Matches(Arc::from(vec![PkgId::new(4)]))
            });
            assert_eq!(got, Cached::Matches(Arc::from(vec![PkgId::new(4)])));
        }
        cache.get_or_insert_with("libbar.so.1".to_string(), || Cached::NotFound);

        assert_eq!(calls, 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 2,
                misses: 2,
                entries: 2
            }
        );
    }
}
