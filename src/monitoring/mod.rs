pub mod perf;
pub mod stats;

pub use perf::PerformanceTimer;
pub use stats::CspStats;
