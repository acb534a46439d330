//! HTTP cache control module
//!
//! HTML is always revalidated because the SPA entry point references freshly
//! built assets. Everything else is assumed to be content-versioned by the
//! bundler and cached for a long time.

use crate::static_files::mime;

/// Cache policy for a served file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Revalidate on every use.
    NoCache,
    /// Public, immutable, with the given max-age (seconds).
    Immutable(u64),
}

impl CachePolicy {
    /// Pick the policy for a content type.
    pub fn for_content_type(content_type: &str, asset_max_age_secs: u64) -> Self {
        if content_type == mime::HTML {
            Self::NoCache
        } else {
            Self::Immutable(asset_max_age_secs)
        }
    }

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::NoCache => "no-cache".to_string(),
            Self::Immutable(max_age) => format!("public, max-age={max_age}, immutable"),
        }
    }
}
