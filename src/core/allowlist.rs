use crate::core::source::Source;
use crate::error::CspError;
use indexmap::IndexSet;
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;

/// The fixed set of third-party origins appended to matching CSP clauses.
///
/// Immutable once built: entries keep insertion order, duplicates are
/// dropped, and the space-joined suffix text is precomputed so the hot
/// augmentation path only copies it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    entries: Vec<Source>,
    joined: String,
    estimated_size: usize,
}

impl AllowList {
    #[inline]
    pub fn builder() -> AllowListBuilder {
        AllowListBuilder::new()
    }

    /// The reviews-widget/CDN allow-list shipped with the storefront.
    pub fn storefront_default() -> Self {
        AllowListBuilder::new()
            .add_source(Source::Host(Cow::Borrowed("https://cdn.judge.me")))
            .add_source(Source::Host(Cow::Borrowed("https://cache.judge.me")))
            .add_source(Source::Host(Cow::Borrowed("https://judgeme.imgix.net")))
            .add_source(Source::Host(Cow::Borrowed("https://tracking.aws.judge.me")))
            .add_source(Source::Host(Cow::Borrowed(
                "https://judgeme-public-images.imgix.net",
            )))
            .add_source(Source::Host(Cow::Borrowed("https://vimeo.com")))
            .add_source(Source::Host(Cow::Borrowed("https://i.vimeocdn.com")))
            .add_source(Source::Host(Cow::Borrowed("https://judge.me")))
            .add_source(Source::Host(Cow::Borrowed("https://ae01.alicdn.com")))
            .add_source(Source::UnsafeInline)
            .add_source(Source::UnsafeEval)
            .add_source(Source::Scheme(Cow::Borrowed("data")))
            .build_unchecked()
    }

    /// Builds an allow-list from raw source expressions, validating each.
    pub fn from_strs<I, S>(raw: I) -> Result<Self, CspError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = AllowListBuilder::new();
        for entry in raw {
            builder = builder.add_raw(entry.as_ref())?;
        }
        builder.build()
    }

    /// Loads an allow-list from a JSON document of the shape
    /// `{"sources": ["https://cdn.example.com", "'unsafe-inline'", "data:"]}`.
    pub fn from_json(json: &str) -> Result<Self, CspError> {
        let config: AllowListConfig = serde_json::from_str(json)?;
        Self::from_strs(config.sources)
    }

    #[inline]
    pub fn entries(&self) -> &[Source] {
        &self.entries
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.entries.iter()
    }

    /// The space-joined suffix appended to matching clauses.
    #[inline]
    pub fn joined(&self) -> &str {
        &self.joined
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn estimated_size(&self) -> usize {
        self.estimated_size
    }
}

impl fmt::Display for AllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined)
    }
}

/// External configuration shape for [`AllowList::from_json`].
#[derive(Debug, Clone, Deserialize)]
pub struct AllowListConfig {
    pub sources: Vec<String>,
}

#[derive(Debug, Default)]
pub struct AllowListBuilder {
    entries: IndexSet<Source>,
}

impl AllowListBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(mut self, source: Source) -> Self {
        self.entries.insert(source);
        self
    }

    pub fn add_sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = Source>,
    {
        for source in sources {
            self.entries.insert(source);
        }
        self
    }

    pub fn add_raw(mut self, raw: &str) -> Result<Self, CspError> {
        self.entries.insert(raw.parse::<Source>()?);
        Ok(self)
    }

    pub fn build(self) -> Result<AllowList, CspError> {
        for source in &self.entries {
            match source {
                Source::Host(host) => Source::validate_host(host)?,
                Source::Scheme(scheme) if scheme.is_empty() => {
                    return Err(CspError::EmptyAllowListEntry("scheme".to_string()));
                }
                Source::Nonce(nonce) if nonce.is_empty() => {
                    return Err(CspError::EmptyAllowListEntry("nonce".to_string()));
                }
                _ => {}
            }
        }
        Ok(self.build_unchecked())
    }

    pub fn build_unchecked(self) -> AllowList {
        let entries: Vec<Source> = self.entries.into_iter().collect();

        let estimated_size = entries.iter().map(Source::estimated_size).sum::<usize>()
            + entries.len().saturating_sub(1);

        let mut joined = String::with_capacity(estimated_size);
        for (idx, source) in entries.iter().enumerate() {
            if idx > 0 {
                joined.push(' ');
            }
            match source.as_static_str() {
                Some(text) => joined.push_str(text),
                None => {
                    use std::fmt::Write;
                    let _ = write!(joined, "{}", source);
                }
            }
        }

        AllowList {
            entries,
            joined,
            estimated_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storefront_default_is_ordered_and_joined() {
        let allowlist = AllowList::storefront_default();

        assert_eq!(allowlist.len(), 12);
        assert_eq!(allowlist.entries()[0].host(), Some("https://cdn.judge.me"));
        assert!(allowlist.joined().starts_with("https://cdn.judge.me "));
        assert!(allowlist
            .joined()
            .ends_with("'unsafe-inline' 'unsafe-eval' data:"));
        assert_eq!(allowlist.joined().len(), allowlist.estimated_size());
    }

    #[test]
    fn builder_dedups_preserving_order() {
        let allowlist = AllowList::builder()
            .add_source(Source::UnsafeInline)
            .add_source(Source::Host("https://a.example".into()))
            .add_source(Source::UnsafeInline)
            .build_unchecked();

        assert_eq!(allowlist.len(), 2);
        assert_eq!(allowlist.joined(), "'unsafe-inline' https://a.example");
    }

    #[test]
    fn build_rejects_empty_entries() {
        let result = AllowList::builder()
            .add_source(Source::Host("".into()))
            .build();
        assert!(matches!(result, Err(CspError::EmptyAllowListEntry(_))));

        let result = AllowList::from_strs(["https://ok.example", ""]);
        assert!(result.is_err());
    }

    #[test]
    fn from_json_parses_sources() {
        let allowlist = AllowList::from_json(
            r#"{"sources": ["https://cdn.judge.me", "'unsafe-inline'", "data:"]}"#,
        )
        .unwrap();

        assert_eq!(
            allowlist.joined(),
            "https://cdn.judge.me 'unsafe-inline' data:"
        );
    }

    #[test]
    fn from_json_surfaces_parse_errors() {
        assert!(AllowList::from_json("not json").is_err());
        assert!(AllowList::from_json(r#"{"sources": ["'bogus-keyword'"]}"#).is_err());
    }

    #[test]
    fn empty_allowlist_has_empty_suffix() {
        let allowlist = AllowList::builder().build_unchecked();
        assert!(allowlist.is_empty());
        assert_eq!(allowlist.joined(), "");
    }
}
