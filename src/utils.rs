use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Removes the first textual occurrence of `needle` from `haystack`.
///
/// Plain substring removal, not token-aware: if the needle text recurs
/// elsewhere it is still only removed once per call.
#[inline]
pub(crate) fn remove_first_occurrence(haystack: &mut String, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    match haystack.find(needle) {
        Some(pos) => {
            haystack.replace_range(pos..pos + needle.len(), "");
            true
        }
        None => false,
    }
}

/// Cache key for a raw header string. Augmentation is deterministic per
/// (input, allow-list), so a stable 64-bit hash is enough to key the result
/// cache.
#[inline]
pub(crate) fn fx_hash_str(s: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(s.as_bytes());
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_only_first_occurrence() {
        let mut s = "a b a b".to_string();
        assert!(remove_first_occurrence(&mut s, "b"));
        assert_eq!(s, "a  a b");
    }

    #[test]
    fn missing_needle_leaves_string_alone() {
        let mut s = "abc".to_string();
        assert!(!remove_first_occurrence(&mut s, "xyz"));
        assert_eq!(s, "abc");
    }

    #[test]
    fn empty_needle_is_a_no_op() {
        let mut s = "abc".to_string();
        assert!(!remove_first_occurrence(&mut s, ""));
        assert_eq!(s, "abc");
    }

    #[test]
    fn hash_is_stable_per_input() {
        assert_eq!(fx_hash_str("default-src"), fx_hash_str("default-src"));
        assert_ne!(fx_hash_str("default-src"), fx_hash_str("script-src"));
    }
}
