use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug)]
pub struct CspStats {
    request_count: AtomicUsize,
    nonce_generation_count: AtomicUsize,
    rules_update_count: AtomicUsize,
    prerender_skip_count: AtomicUsize,
    missing_policy_skip_count: AtomicUsize,
    injected_element_count: AtomicUsize,
    header_count: AtomicUsize,
    serialize_error_count: AtomicUsize,
    header_generation_time_ns: AtomicUsize,
    start_time: Instant,
}

impl Default for CspStats {
    fn default() -> Self {
        Self {
            request_count: Default::default(),
            nonce_generation_count: Default::default(),
            rules_update_count: Default::default(),
            prerender_skip_count: Default::default(),
            missing_policy_skip_count: Default::default(),
            injected_element_count: Default::default(),
            header_count: Default::default(),
            serialize_error_count: Default::default(),
            header_generation_time_ns: Default::default(),
            start_time: Instant::now(),
        }
    }
}

impl CspStats {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn nonce_generation_count(&self) -> usize {
        self.nonce_generation_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rules_update_count(&self) -> usize {
        self.rules_update_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn prerender_skip_count(&self) -> usize {
        self.prerender_skip_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn missing_policy_skip_count(&self) -> usize {
        self.missing_policy_skip_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn injected_element_count(&self) -> usize {
        self.injected_element_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn header_count(&self) -> usize {
        self.header_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn serialize_error_count(&self) -> usize {
        self.serialize_error_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn avg_header_generation_time_ns(&self) -> f64 {
        let count = self.header_count();
        if count == 0 {
            0.0
        } else {
            self.header_generation_time_ns.load(Ordering::Relaxed) as f64 / count as f64
        }
    }

    #[inline]
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    #[inline]
    pub(crate) fn increment_request_count(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_nonce_generation_count(&self) {
        self.nonce_generation_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_rules_update_count(&self) {
        self.rules_update_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_prerender_skip_count(&self) {
        self.prerender_skip_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_missing_policy_skip_count(&self) {
        self.missing_policy_skip_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_injected_elements(&self, count: usize) {
        self.injected_element_count.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_header_count(&self) {
        self.header_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_serialize_error_count(&self) {
        self.serialize_error_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_header_generation_time(&self, time_ns: usize) {
        self.header_generation_time_ns
            .fetch_add(time_ns, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.request_count.store(0, Ordering::Relaxed);
        self.nonce_generation_count.store(0, Ordering::Relaxed);
        self.rules_update_count.store(0, Ordering::Relaxed);
        self.prerender_skip_count.store(0, Ordering::Relaxed);
        self.missing_policy_skip_count.store(0, Ordering::Relaxed);
        self.injected_element_count.store(0, Ordering::Relaxed);
        self.header_count.store(0, Ordering::Relaxed);
        self.serialize_error_count.store(0, Ordering::Relaxed);
        self.header_generation_time_ns.store(0, Ordering::Relaxed);
    }
}

impl fmt::Display for CspStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CSP Nonce Statistics:")?;
        writeln!(f, "  Uptime: {} seconds", self.uptime_secs())?;
        writeln!(f, "  Requests processed: {}", self.request_count())?;
        writeln!(f, "  Nonces generated: {}", self.nonce_generation_count())?;
        writeln!(f, "  Route rule updates: {}", self.rules_update_count())?;
        writeln!(f, "  Prerender skips: {}", self.prerender_skip_count())?;
        writeln!(f, "  Responses without policy: {}", self.missing_policy_skip_count())?;
        writeln!(f, "  Elements stamped: {}", self.injected_element_count())?;
        writeln!(f, "  Headers set: {}", self.header_count())?;
        writeln!(f, "  Serialization failures: {}", self.serialize_error_count())?;
        writeln!(
            f,
            "  Average header generation time: {:.2} ns",
            self.avg_header_generation_time_ns()
        )?;
        Ok(())
    }
}
