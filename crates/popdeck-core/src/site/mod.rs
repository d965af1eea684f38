//! Site predicates deciding whether a panel may act on the active tab.

mod host_matcher;

pub use host_matcher::{HostPattern, registrable_domain};

use url::Url;

/// Which pages a panel's content actions are allowed to target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteRule {
    /// Any http(s) page
    AnyPage,
    /// Pages whose registrable domain equals the given one (e.g. linkedin.com)
    Domain(&'static str),
    /// Pages whose host matches one of the host patterns
    Hosts(&'static [&'static str]),
}

impl SiteRule {
    /// Check whether a tab URL satisfies this rule
    pub fn matches(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }

        let Some(host) = parsed.host_str() else {
            return false;
        };

        match self {
            SiteRule::AnyPage => true,
            SiteRule::Domain(domain) => registrable_domain(host) == domain.to_lowercase(),
            SiteRule::Hosts(patterns) => patterns.iter().any(|raw| match HostPattern::parse(raw) {
                Ok(pattern) => pattern.matches(host),
                Err(e) => {
                    tracing::warn!("Ignoring site pattern: {}", e);
                    false
                }
            }),
        }
    }

    /// Short human-readable description, used in listings
    pub fn describe(&self) -> String {
        match self {
            SiteRule::AnyPage => "any page".to_string(),
            SiteRule::Domain(domain) => (*domain).to_string(),
            SiteRule::Hosts(patterns) => patterns.join(", "),
        }
    }
}
