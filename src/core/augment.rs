use crate::constants::{
    CONNECT_SRC, DEFAULT_SRC, NONCE_MARKER, SCRIPT_SRC, SEMICOLON, SEMICOLON_SPACE, STYLE_SRC,
};
use crate::core::allowlist::AllowList;
use crate::utils::remove_first_occurrence;
use smallvec::SmallVec;
use std::sync::Arc;

/// Rewrites a baseline CSP header produced by the upstream policy generator:
/// the allow-list is appended to every `connect-src`, `script-src`,
/// `style-src`, and `default-src` clause, and the nonce tokens found in
/// `default-src` clauses are stripped from the joined result.
///
/// The transform is intentionally NOT idempotent: augmenting an already
/// augmented header appends the allow-list again. Callers own the
/// apply-once guarantee (the middleware applies it to the upstream header
/// exactly once per response).
#[derive(Debug, Clone)]
pub struct CspAugmenter {
    allowlist: Arc<AllowList>,
}

/// Result of one augmentation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentOutcome {
    header: String,
    removed_nonces: usize,
}

impl AugmentOutcome {
    #[inline]
    pub fn header(&self) -> &str {
        &self.header
    }

    #[inline]
    pub fn into_header(self) -> String {
        self.header
    }

    /// How many recorded nonce tokens were actually excised.
    #[inline]
    pub fn removed_nonces(&self) -> usize {
        self.removed_nonces
    }
}

impl CspAugmenter {
    #[inline]
    pub fn new(allowlist: AllowList) -> Self {
        Self {
            allowlist: Arc::new(allowlist),
        }
    }

    #[inline]
    pub fn with_shared(allowlist: Arc<AllowList>) -> Self {
        Self { allowlist }
    }

    #[inline]
    pub fn allowlist(&self) -> &AllowList {
        &self.allowlist
    }

    #[inline]
    pub fn augment(&self, raw: &str) -> String {
        self.augment_outcome(raw).into_header()
    }

    /// The full pass. Clause order is preserved; clauses are never dropped,
    /// only grown. Directive names are matched by substring, which is sound
    /// for the fixed set in use (none is a substring of another).
    pub fn augment_outcome(&self, raw: &str) -> AugmentOutcome {
        let suffix = self.allowlist.joined();

        let clause_hint = raw.matches(SEMICOLON).count() + 1;
        let mut out = String::with_capacity(raw.len() + clause_hint * (suffix.len() + 3));

        // Nonce tokens are collected across every default-src clause, then
        // each removes its first occurrence from the joined string.
        let mut nonce_tokens: SmallVec<[&str; 2]> = SmallVec::new();

        for (idx, clause) in raw.split(SEMICOLON).enumerate() {
            if idx > 0 {
                out.push_str(SEMICOLON_SPACE);
            }
            out.push_str(clause);

            if clause.contains(CONNECT_SRC)
                || clause.contains(SCRIPT_SRC)
                || clause.contains(STYLE_SRC)
            {
                push_suffix(&mut out, suffix);
            }

            if clause.contains(DEFAULT_SRC) {
                nonce_tokens.extend(
                    clause
                        .split(' ')
                        .filter(|token| token.contains(NONCE_MARKER)),
                );
                push_suffix(&mut out, suffix);
            }
        }

        let mut removed_nonces = 0;
        for token in &nonce_tokens {
            if remove_first_occurrence(&mut out, token) {
                removed_nonces += 1;
            }
        }

        AugmentOutcome {
            header: out,
            removed_nonces,
        }
    }
}

#[inline]
fn push_suffix(out: &mut String, suffix: &str) {
    if !suffix.is_empty() {
        out.push(' ');
        out.push_str(suffix);
    }
}
