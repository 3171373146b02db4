pub mod allowlist;
pub mod augment;
pub mod config;
pub mod source;

pub use allowlist::{AllowList, AllowListBuilder, AllowListConfig};
pub use augment::{AugmentOutcome, CspAugmenter};
pub use config::{AugmentConfig, AugmentConfigBuilder};
pub use source::Source;
