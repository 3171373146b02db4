use crate::security::nonce::NonceGenerator;
use dashmap::DashMap;
use std::borrow::Cow;

/// A baseline policy produced for one request: the minted nonce and the
/// directive string that embeds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPolicy {
    pub nonce: String,
    pub header: String,
}

/// Models the upstream policy-generation collaborator: produces the
/// platform baseline CSP the storefront starts from, with a fresh nonce in
/// `default-src`. The augmenter rewrites this header on the way out.
///
/// Nonces are memoized per request id so rendering and header serialization
/// observe the same value.
#[derive(Debug)]
pub struct BaselinePolicy {
    nonce_generator: NonceGenerator,
    per_request: DashMap<String, String>,
    platform_cdn: Cow<'static, str>,
}

impl BaselinePolicy {
    #[inline]
    pub fn new() -> Self {
        Self::with_platform_cdn("https://cdn.shopify.com")
    }

    pub fn with_platform_cdn(cdn: impl Into<Cow<'static, str>>) -> Self {
        Self {
            nonce_generator: NonceGenerator::default(),
            per_request: DashMap::new(),
            platform_cdn: cdn.into(),
        }
    }

    pub fn generate(&self) -> GeneratedPolicy {
        let nonce = self.nonce_generator.generate();
        GeneratedPolicy {
            header: self.header_for(&nonce),
            nonce,
        }
    }

    pub fn generate_for_request(&self, request_id: &str) -> GeneratedPolicy {
        let nonce = self
            .per_request
            .entry(request_id.to_string())
            .or_insert_with(|| self.nonce_generator.generate())
            .value()
            .clone();
        GeneratedPolicy {
            header: self.header_for(&nonce),
            nonce,
        }
    }

    #[inline]
    pub fn request_nonce(&self, request_id: &str) -> Option<String> {
        self.per_request.get(request_id).map(|n| n.value().clone())
    }

    #[inline]
    pub fn clear_request_nonces(&self) {
        self.per_request.clear();
    }

    #[inline]
    pub fn nonce_generator(&self) -> &NonceGenerator {
        &self.nonce_generator
    }

    fn header_for(&self, nonce: &str) -> String {
        let cdn = &self.platform_cdn;
        format!(
            "base-uri 'self'; \
             default-src 'self' 'nonce-{nonce}' {cdn}; \
             frame-ancestors 'none'; \
             script-src 'self' {cdn}; \
             style-src 'self' 'unsafe-inline' {cdn}; \
             connect-src 'self' https://monorail-edge.shopifysvc.com; \
             img-src 'self' {cdn} data:"
        )
    }
}

impl Default for BaselinePolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_embeds_nonce_in_default_src() {
        let baseline = BaselinePolicy::new();
        let policy = baseline.generate();

        let default_src = policy
            .header
            .split(';')
            .find(|clause| clause.contains("default-src"))
            .unwrap();
        assert!(default_src.contains(&format!("'nonce-{}'", policy.nonce)));
    }

    #[test]
    fn request_nonces_are_memoized_per_id() {
        let baseline = BaselinePolicy::new();

        let first = baseline.generate_for_request("req-1");
        let again = baseline.generate_for_request("req-1");
        let other = baseline.generate_for_request("req-2");

        assert_eq!(first.nonce, again.nonce);
        assert_ne!(first.nonce, other.nonce);
        assert_eq!(baseline.request_nonce("req-1"), Some(first.nonce));

        baseline.clear_request_nonces();
        assert_eq!(baseline.request_nonce("req-1"), None);
    }

    #[test]
    fn custom_platform_cdn_lands_in_every_src_clause() {
        let baseline = BaselinePolicy::with_platform_cdn("https://cdn.example.shop");
        let policy = baseline.generate();

        for directive in ["default-src", "script-src", "style-src", "img-src"] {
            let clause = policy
                .header
                .split(';')
                .find(|c| c.contains(directive))
                .unwrap();
            assert!(clause.contains("https://cdn.example.shop"), "{directive}");
        }
    }
}
