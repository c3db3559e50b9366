//! Recognizing the response a caller is waiting for.

use regex::Regex;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Matching always runs against the full request URL of each observed
/// response event.
#[derive(Clone, Debug)]
pub enum UrlMatcher {
    /// Literal substring.
    Contains(String),

    /// Regular expression.
    Pattern(Regex),

    /// Exact host, case-insensitive.
    Host(String),
}

impl UrlMatcher {
    pub fn contains(needle: impl Into<String>) -> Self {
        Self::Contains(needle.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self, MatcherError> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    pub fn host(host: impl Into<String>) -> Self {
        Self::Host(host.into())
    }

    pub fn matches(&self, url: &str) -> bool {
        match self {
            UrlMatcher::Contains(needle) => url.contains(needle.as_str()),
            UrlMatcher::Pattern(regex) => regex.is_match(url),
            UrlMatcher::Host(host) => Url::parse(url)
                .ok()
                .and_then(|parsed| {
                    parsed
                        .host_str()
                        .map(|candidate| candidate.eq_ignore_ascii_case(host))
                })
                .unwrap_or(false),
        }
    }
}
