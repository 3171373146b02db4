pub use crate::core::{AllowList, AllowListBuilder, AugmentConfig, CspAugmenter, Source};
pub use crate::handler::{render_storefront, HtmlRenderer, StorefrontService};
pub use crate::middleware::{
    configure_augmenter, csp_augmenter, csp_augmenter_with_config, AugmentExtensions,
    CspAugmentMiddleware,
};
pub use crate::monitoring::AugmentStats;
pub use crate::security::{BaselinePolicy, NonceGenerator, RequestNonce};
