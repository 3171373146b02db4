pub(crate) const HEADER_CSP: &str = "content-security-policy";
pub(crate) const CONTENT_TYPE_HTML: &str = "text/html";

pub(crate) const DEFAULT_SRC: &str = "default-src";
pub(crate) const SCRIPT_SRC: &str = "script-src";
pub(crate) const STYLE_SRC: &str = "style-src";
pub(crate) const CONNECT_SRC: &str = "connect-src";

pub(crate) const NONE_SOURCE: &str = "'none'";
pub(crate) const SELF_SOURCE: &str = "'self'";
pub(crate) const UNSAFE_INLINE_SOURCE: &str = "'unsafe-inline'";
pub(crate) const UNSAFE_EVAL_SOURCE: &str = "'unsafe-eval'";
pub(crate) const NONCE_PREFIX: &str = "'nonce-";
pub(crate) const SUFFIX_QUOTE: &str = "'";

// Sub-tokens of a default-src clause are matched against this marker when
// collecting the nonce tokens to strip from the joined header.
pub(crate) const NONCE_MARKER: &str = "nonce";

pub(crate) const SEMICOLON: char = ';';
pub(crate) const SEMICOLON_SPACE: &str = "; ";

pub(crate) const DEFAULT_NONCE_LENGTH: usize = 16;
pub(crate) const DEFAULT_RESULT_CACHE_ENTRIES: usize = 64;
