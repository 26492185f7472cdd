use std::time::{Duration, Instant};

pub struct PerformanceTimer {
    start: Instant,
}

impl PerformanceTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ns(&self) -> usize {
        self.elapsed().as_nanos().min(usize::MAX as u128) as usize
    }
}

impl Default for PerformanceTimer {
    fn default() -> Self {
        Self::new()
    }
}
