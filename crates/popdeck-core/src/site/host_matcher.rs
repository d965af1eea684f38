use glob::Pattern;

/// A host pattern a tab must match before a panel talks to it
#[derive(Debug, Clone)]
pub enum HostPattern {
    /// Exact hostname match (case-insensitive)
    Exact(String),
    /// Glob pattern match (e.g., *.skool.com)
    Glob(Pattern),
}

impl HostPattern {
    /// Parse a host pattern string
    ///
    /// Patterns containing '*' or '?' are globs, anything else is an exact
    /// hostname. Both are compared lowercased.
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        let pattern_lower = pattern.to_lowercase();
        if pattern_lower.contains('*') || pattern_lower.contains('?') {
            let glob_pattern = Pattern::new(&pattern_lower).map_err(|e| {
                crate::Error::InvalidPattern(format!("'{}': {}", pattern, e))
            })?;
            Ok(HostPattern::Glob(glob_pattern))
        } else {
            Ok(HostPattern::Exact(pattern_lower))
        }
    }

    /// Check if a hostname matches this pattern
    pub fn matches(&self, hostname: &str) -> bool {
        let hostname_lower = hostname.to_lowercase();
        match self {
            HostPattern::Exact(pattern) => &hostname_lower == pattern,
            HostPattern::Glob(pattern) => pattern.matches(&hostname_lower),
        }
    }
}

/// Registrable domain of a host using the Public Suffix List
pub fn registrable_domain(host: &str) -> String {
    if host.parse::<std::net::IpAddr>().is_ok() {
        return host.to_string();
    }

    let host = host.to_lowercase();
    match psl::domain(host.as_bytes()) {
        Some(root) => String::from_utf8_lossy(root.as_bytes()).to_string(),
        None => {
            let labels: Vec<&str> = host.split('.').collect();
            if labels.len() >= 2 {
                format!("{}.{}", labels[labels.len() - 2], labels[labels.len() - 1])
            } else {
                host
            }
        }
    }
}
