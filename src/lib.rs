pub mod constants;
pub mod core;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod monitoring;
pub mod prelude;
pub mod security;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::{
    AllowList, AllowListBuilder, AugmentConfig, AugmentConfigBuilder, AugmentOutcome,
    CspAugmenter, Source,
};
pub use error::CspError;
pub use handler::{render_storefront, HtmlRenderer, StorefrontService};
pub use middleware::{
    configure_augmenter, csp_augmenter, csp_augmenter_with_config, AugmentExtensions,
    CspAugmentMiddleware, RequestId,
};
pub use monitoring::AugmentStats;
pub use security::{BaselinePolicy, GeneratedPolicy, NonceGenerator, RequestNonce};
