use crate::constants::DEFAULT_RESULT_CACHE_ENTRIES;
use crate::core::allowlist::AllowList;
use crate::core::augment::CspAugmenter;
use crate::error::CspError;
use crate::monitoring::stats::AugmentStats;
use crate::utils::fx_hash_str;
use actix_web::http::header::HeaderValue;
use arc_swap::ArcSwap;
use bytes::Bytes;
use lru::LruCache;
use parking_lot::RwLock;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Shared runtime configuration for the augmenter: the live allow-list, the
/// result cache, and the stats counters. Cloning is cheap; every clone sees
/// the same state.
///
/// Augmentation is deterministic per (input header, allow-list), so results
/// are cached by a hash of the raw header and invalidated when the
/// allow-list is swapped.
#[derive(Clone)]
pub struct AugmentConfig {
    allowlist: Arc<ArcSwap<AllowList>>,
    result_cache: Arc<RwLock<LruCache<u64, HeaderValue>>>,
    stats: Arc<AugmentStats>,
}

impl AugmentConfig {
    pub fn new(allowlist: AllowList) -> Self {
        Self::with_cache_entries(allowlist, DEFAULT_RESULT_CACHE_ENTRIES)
    }

    fn with_cache_entries(allowlist: AllowList, entries: usize) -> Self {
        let entries = NonZeroUsize::new(entries)
            .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_RESULT_CACHE_ENTRIES).unwrap());
        Self {
            allowlist: Arc::new(ArcSwap::from_pointee(allowlist)),
            result_cache: Arc::new(RwLock::new(LruCache::new(entries))),
            stats: Arc::new(AugmentStats::new()),
        }
    }

    #[inline]
    pub fn allowlist(&self) -> Arc<AllowList> {
        self.allowlist.load_full()
    }

    /// Swaps the live allow-list. Cached results belong to the old list and
    /// are dropped.
    pub fn set_allowlist(&self, allowlist: AllowList) {
        self.allowlist.store(Arc::new(allowlist));
        self.result_cache.write().clear();
        self.stats.increment_allowlist_update_count();
    }

    #[inline]
    pub fn stats(&self) -> &Arc<AugmentStats> {
        &self.stats
    }

    /// Cached entry point used by the middleware.
    pub fn augment(&self, raw: &str) -> Result<HeaderValue, CspError> {
        let key = fx_hash_str(raw);

        if let Some(value) = self.result_cache.write().get(&key).cloned() {
            self.stats.increment_cache_hit_count();
            return Ok(value);
        }

        let outcome = CspAugmenter::with_shared(self.allowlist()).augment_outcome(raw);
        self.stats.add_stripped_nonce_count(outcome.removed_nonces());

        let value = HeaderValue::from_maybe_shared(Bytes::from(outcome.into_header()))
            .map_err(|e| CspError::InvalidHeaderValue(e.to_string()))?;

        self.result_cache.write().put(key, value.clone());
        self.stats.increment_augmented_header_count();
        Ok(value)
    }
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self::new(AllowList::storefront_default())
    }
}

#[derive(Default)]
pub struct AugmentConfigBuilder {
    allowlist: Option<AllowList>,
    cache_size: Option<usize>,
}

impl AugmentConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn allowlist(mut self, allowlist: AllowList) -> Self {
        self.allowlist = Some(allowlist);
        self
    }

    #[inline]
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }

    pub fn build(self) -> AugmentConfig {
        let allowlist = self
            .allowlist
            .unwrap_or_else(AllowList::storefront_default);
        match self.cache_size {
            Some(size) => AugmentConfig::with_cache_entries(allowlist, size),
            None => AugmentConfig::new(allowlist),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_inputs_hit_the_cache() {
        let config = AugmentConfig::default();
        let raw = "default-src 'self'; script-src 'self'";

        let first = config.augment(raw).unwrap();
        let second = config.augment(raw).unwrap();

        assert_eq!(first, second);
        assert_eq!(config.stats().cache_hit_count(), 1);
        assert_eq!(config.stats().augmented_header_count(), 1);
    }

    #[test]
    fn allowlist_swap_invalidates_cache() {
        let config = AugmentConfig::default();
        let raw = "script-src 'self'";

        let before = config.augment(raw).unwrap();
        config.set_allowlist(
            AllowList::from_strs(["https://widgets.example"]).unwrap(),
        );
        let after = config.augment(raw).unwrap();

        assert_ne!(before, after);
        assert!(after
            .to_str()
            .unwrap()
            .contains("script-src 'self' https://widgets.example"));
        assert_eq!(config.stats().allowlist_update_count(), 1);
        assert_eq!(config.stats().cache_hit_count(), 0);
    }

    #[test]
    fn control_characters_surface_as_header_errors() {
        let config = AugmentConfig::default();
        assert!(config.augment("default-src 'self'\r\nevil").is_err());
    }
}
