use crate::constants::{
    NONCE_PREFIX, NONE_SOURCE, SELF_SOURCE, SUFFIX_QUOTE, UNSAFE_EVAL_SOURCE, UNSAFE_INLINE_SOURCE,
};
use crate::error::CspError;
use std::{borrow::Cow, fmt, str::FromStr};

/// A single CSP source expression, in the typed form used by the allow-list
/// and the baseline policy generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    None,
    Self_,
    UnsafeInline,
    UnsafeEval,
    Host(Cow<'static, str>),
    Scheme(Cow<'static, str>),
    Nonce(Cow<'static, str>),
}

impl Source {
    #[inline(always)]
    pub const fn is_none(&self) -> bool {
        matches!(self, Source::None)
    }

    #[inline(always)]
    pub const fn is_self(&self) -> bool {
        matches!(self, Source::Self_)
    }

    #[inline(always)]
    pub const fn is_keyword(&self) -> bool {
        matches!(
            self,
            Source::None | Source::Self_ | Source::UnsafeInline | Source::UnsafeEval
        )
    }

    #[inline]
    pub const fn as_static_str(&self) -> Option<&'static str> {
        match self {
            Source::None => Some(NONE_SOURCE),
            Source::Self_ => Some(SELF_SOURCE),
            Source::UnsafeInline => Some(UNSAFE_INLINE_SOURCE),
            Source::UnsafeEval => Some(UNSAFE_EVAL_SOURCE),
            _ => None,
        }
    }

    /// Rendered length in the header text, used to pre-size buffers.
    #[inline]
    pub fn estimated_size(&self) -> usize {
        match self {
            Source::None => NONE_SOURCE.len(),
            Source::Self_ => SELF_SOURCE.len(),
            Source::UnsafeInline => UNSAFE_INLINE_SOURCE.len(),
            Source::UnsafeEval => UNSAFE_EVAL_SOURCE.len(),
            Source::Host(host) => host.len(),
            Source::Scheme(scheme) => scheme.len() + 1,
            Source::Nonce(nonce) => NONCE_PREFIX.len() + nonce.len() + SUFFIX_QUOTE.len(),
        }
    }

    #[inline]
    pub fn host(&self) -> Option<&str> {
        match self {
            Source::Host(host) => Some(host),
            _ => None,
        }
    }

    #[inline]
    pub fn scheme(&self) -> Option<&str> {
        match self {
            Source::Scheme(scheme) => Some(scheme),
            _ => None,
        }
    }

    #[inline]
    pub fn nonce(&self) -> Option<&str> {
        match self {
            Source::Nonce(nonce) => Some(nonce),
            _ => None,
        }
    }

    /// Validates a host entry. Full origins must parse as URLs; bare hosts
    /// (`cdn.example.com`, `*.example.com`) only need to be free of
    /// whitespace and delimiters.
    pub(crate) fn validate_host(host: &str) -> Result<(), CspError> {
        if host.is_empty() {
            return Err(CspError::EmptyAllowListEntry("host".to_string()));
        }
        if host.contains("://") {
            url::Url::parse(host)
                .map_err(|e| CspError::InvalidSourceExpression(format!("{host}: {e}")))?;
        } else if host.contains(char::is_whitespace) || host.contains(';') {
            return Err(CspError::InvalidSourceExpression(host.to_string()));
        }
        Ok(())
    }
}

impl FromStr for Source {
    type Err = CspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(CspError::EmptyAllowListEntry("source".to_string())),
            NONE_SOURCE => Ok(Source::None),
            SELF_SOURCE => Ok(Source::Self_),
            UNSAFE_INLINE_SOURCE => Ok(Source::UnsafeInline),
            UNSAFE_EVAL_SOURCE => Ok(Source::UnsafeEval),
            _ => {
                if let Some(rest) = s.strip_prefix(NONCE_PREFIX) {
                    let nonce = rest.strip_suffix(SUFFIX_QUOTE).unwrap_or(rest);
                    if nonce.is_empty() {
                        return Err(CspError::EmptyAllowListEntry("nonce".to_string()));
                    }
                    return Ok(Source::Nonce(Cow::Owned(nonce.to_string())));
                }
                if s.starts_with('\'') {
                    return Err(CspError::InvalidSourceExpression(s.to_string()));
                }
                if let Some(scheme) = s.strip_suffix(':') {
                    if scheme.is_empty() {
                        return Err(CspError::EmptyAllowListEntry("scheme".to_string()));
                    }
                    if !scheme.contains('/') {
                        return Ok(Source::Scheme(Cow::Owned(scheme.to_string())));
                    }
                }
                Source::validate_host(s)?;
                Ok(Source::Host(Cow::Owned(s.to_string())))
            }
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::None => f.write_str(NONE_SOURCE),
            Source::Self_ => f.write_str(SELF_SOURCE),
            Source::UnsafeInline => f.write_str(UNSAFE_INLINE_SOURCE),
            Source::UnsafeEval => f.write_str(UNSAFE_EVAL_SOURCE),
            Source::Host(host) => f.write_str(host),
            Source::Scheme(scheme) => write!(f, "{}:", scheme),
            Source::Nonce(nonce) => write!(f, "{}{}{}", NONCE_PREFIX, nonce, SUFFIX_QUOTE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keyword_sources() {
        assert_eq!("'self'".parse::<Source>().unwrap(), Source::Self_);
        assert_eq!("'none'".parse::<Source>().unwrap(), Source::None);
        assert_eq!(
            "'unsafe-inline'".parse::<Source>().unwrap(),
            Source::UnsafeInline
        );
        assert_eq!(
            "'unsafe-eval'".parse::<Source>().unwrap(),
            Source::UnsafeEval
        );
    }

    #[test]
    fn parses_scheme_and_host() {
        assert_eq!(
            "data:".parse::<Source>().unwrap(),
            Source::Scheme("data".into())
        );
        assert_eq!(
            "https://cdn.judge.me".parse::<Source>().unwrap(),
            Source::Host("https://cdn.judge.me".into())
        );
        assert_eq!(
            "*.example.com".parse::<Source>().unwrap(),
            Source::Host("*.example.com".into())
        );
    }

    #[test]
    fn parses_nonce() {
        let source = "'nonce-abc123'".parse::<Source>().unwrap();
        assert_eq!(source.nonce(), Some("abc123"));
        assert_eq!(source.to_string(), "'nonce-abc123'");
    }

    #[test]
    fn rejects_invalid_expressions() {
        assert!("".parse::<Source>().is_err());
        assert!("'strict-dynamic-typo".parse::<Source>().is_err());
        assert!("'nonce-'".parse::<Source>().is_err());
        assert!("https://not a url".parse::<Source>().is_err());
    }

    #[test]
    fn display_round_trips_estimated_size() {
        for raw in ["'self'", "data:", "https://cdn.judge.me", "'nonce-xyz'"] {
            let source = raw.parse::<Source>().unwrap();
            assert_eq!(source.to_string().len(), source.estimated_size());
        }
    }
}
