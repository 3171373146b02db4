pub mod csp;
pub mod extensions;

pub use csp::{CspAugmentMiddleware, CspAugmentService};
pub use extensions::{AugmentExtensions, RequestId};

pub use csp::{configure_augmenter, csp_augmenter, csp_augmenter_with_config};
