use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug)]
pub struct AugmentStats {
    request_count: AtomicUsize,
    augmented_header_count: AtomicUsize,
    stripped_nonce_count: AtomicUsize,
    cache_hit_count: AtomicUsize,
    allowlist_update_count: AtomicUsize,
    render_error_count: AtomicUsize,
    start_time: Instant,
}

impl Default for AugmentStats {
    fn default() -> Self {
        Self {
            request_count: Default::default(),
            augmented_header_count: Default::default(),
            stripped_nonce_count: Default::default(),
            cache_hit_count: Default::default(),
            allowlist_update_count: Default::default(),
            render_error_count: Default::default(),
            start_time: Instant::now(),
        }
    }
}

impl AugmentStats {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn augmented_header_count(&self) -> usize {
        self.augmented_header_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn stripped_nonce_count(&self) -> usize {
        self.stripped_nonce_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn cache_hit_count(&self) -> usize {
        self.cache_hit_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn allowlist_update_count(&self) -> usize {
        self.allowlist_update_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn render_error_count(&self) -> usize {
        self.render_error_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    #[inline]
    pub fn requests_per_second(&self) -> f64 {
        let uptime = self.start_time.elapsed().as_secs_f64();
        if uptime > 0.0 {
            self.request_count() as f64 / uptime
        } else {
            0.0
        }
    }

    #[inline]
    pub(crate) fn increment_request_count(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_augmented_header_count(&self) {
        self.augmented_header_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_stripped_nonce_count(&self, count: usize) {
        self.stripped_nonce_count.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_cache_hit_count(&self) {
        self.cache_hit_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_allowlist_update_count(&self) {
        self.allowlist_update_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_render_error_count(&self) {
        self.render_error_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn reset(&self) {
        self.request_count.store(0, Ordering::Relaxed);
        self.augmented_header_count.store(0, Ordering::Relaxed);
        self.stripped_nonce_count.store(0, Ordering::Relaxed);
        self.cache_hit_count.store(0, Ordering::Relaxed);
        self.allowlist_update_count.store(0, Ordering::Relaxed);
        self.render_error_count.store(0, Ordering::Relaxed);
    }
}

impl fmt::Display for AugmentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CSP Augmenter Statistics:")?;
        writeln!(f, "  Uptime: {} seconds", self.uptime_secs())?;
        writeln!(f, "  Requests processed: {}", self.request_count())?;
        writeln!(
            f,
            "  Requests per second: {:.2}",
            self.requests_per_second()
        )?;
        writeln!(f, "  Headers augmented: {}", self.augmented_header_count())?;
        writeln!(f, "  Nonce tokens stripped: {}", self.stripped_nonce_count())?;
        writeln!(f, "  Cache hits: {}", self.cache_hit_count())?;
        writeln!(f, "  Allow-list updates: {}", self.allowlist_update_count())?;
        writeln!(f, "  Render errors: {}", self.render_error_count())?;
        Ok(())
    }
}
