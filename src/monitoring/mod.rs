pub mod stats;

pub use stats::AugmentStats;
