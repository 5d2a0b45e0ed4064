use super::dns_request::normalize_domain;
use std::fmt;

/// Domain selector of a configuration rule.
///
/// `*.foo.com` keeps everything after the `*` (including the leading dot) and
/// matches by plain string suffix: `bar.foo.com` and `a.b.foo.com` match,
/// `foo.com` and `xfoo.com` do not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainPattern {
    Any,
    Suffix(String),
    Exact(String),
}

impl DomainPattern {
    pub fn parse(pattern: &str) -> Self {
        let pattern = normalize_domain(pattern.trim());
        if pattern == "*" {
            return DomainPattern::Any;
        }
        if pattern.starts_with("*.") {
            return DomainPattern::Suffix(pattern[1..].to_string());
        }
        DomainPattern::Exact(pattern)
    }

    /// `domain` must already be in lookup form (see [`normalize_domain`]).
    pub fn matches(&self, domain: &str) -> bool {
        match self {
            DomainPattern::Any => true,
            DomainPattern::Suffix(suffix) => domain.ends_with(suffix.as_str()),
            DomainPattern::Exact(exact) => domain == exact,
        }
    }
}

impl fmt::Display for DomainPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainPattern::Any => write!(f, "*"),
            DomainPattern::Suffix(suffix) => write!(f, "*{}", suffix),
            DomainPattern::Exact(exact) => write!(f, "{}", exact),
        }
    }
}
