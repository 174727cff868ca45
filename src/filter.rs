use crate::error::ConfigError;
use crate::parsers::ParserType;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Which hosts count as internal to the crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostScope {
    /// Only the base URL's host itself
    #[default]
    ExactHost,
    /// The base host and any of its subdomains
    IncludeSubdomains,
}

/// Configuration for URL filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlFilterConfig {
    /// Host of the base URL
    pub base_host: String,

    /// How strictly links must match the base host
    #[serde(default)]
    pub scope: HostScope,

    /// Regex patterns for URLs to include (if empty, all URLs are included unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude (these take precedence over include patterns)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Decides which discovered links are internal and worth following
#[derive(Debug, Clone)]
pub struct UrlFilter {
    base_host: String,
    scope: HostScope,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

impl UrlFilter {
    /// Create a new URL filter
    pub fn new(config: UrlFilterConfig) -> Result<Self, ConfigError> {
        let include_regexes = compile(&config.include_patterns)?;
        let exclude_regexes = compile(&config.exclude_patterns)?;

        Ok(Self {
            base_host: config.base_host.to_ascii_lowercase(),
            scope: config.scope,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Filter scoped to the host of `base_url` with no extra patterns
    pub fn for_base(base_url: &Url, scope: HostScope) -> Result<Self, ConfigError> {
        Self::new(UrlFilterConfig {
            base_host: base_url.host_str().unwrap_or_default().to_string(),
            scope,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        })
    }

    /// Determine if a URL should be crawled based on all filtering rules
    pub fn should_crawl(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        if !self.is_in_scope(url) {
            return false;
        }

        // Assets never hold page text
        if ParserType::from_url(url) == ParserType::Asset {
            return false;
        }

        // Exclusions take precedence
        let url_str = url.as_str();
        if self.exclude_regexes.iter().any(|re| re.is_match(url_str)) {
            return false;
        }

        self.include_regexes.is_empty() || self.include_regexes.iter().any(|re| re.is_match(url_str))
    }

    /// Check if a URL's host is internal to the crawl
    pub fn is_in_scope(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };

        match self.scope {
            HostScope::ExactHost => host == self.base_host,
            HostScope::IncludeSubdomains => {
                host == self.base_host
                    || host
                        .strip_suffix(self.base_host.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }
        }
    }

    /// Canonical form used for visited tracking (the fragment is dropped)
    pub fn normalize_url(url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(scope: HostScope) -> UrlFilter {
        UrlFilter::for_base(&Url::parse("https://example.com/").unwrap(), scope).unwrap()
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_exact_host() {
        let filter = filter(HostScope::ExactHost);

        assert!(filter.should_crawl(&url("https://example.com/page")));
        assert!(filter.should_crawl(&url("http://example.com/other")));
        assert!(!filter.should_crawl(&url("https://other.com/page")));
        assert!(!filter.should_crawl(&url("https://docs.example.com/page")));
        assert!(!filter.should_crawl(&url("https://notexample.com/page")));
    }

    #[test]
    fn test_include_subdomains() {
        let filter = filter(HostScope::IncludeSubdomains);

        assert!(filter.should_crawl(&url("https://example.com/page")));
        assert!(filter.should_crawl(&url("https://docs.example.com/page")));
        assert!(filter.should_crawl(&url("https://a.b.example.com/")));
        assert!(!filter.should_crawl(&url("https://notexample.com/page")));
        assert!(!filter.should_crawl(&url("https://example.com.evil.org/")));
    }

    #[test]
    fn test_assets_and_schemes_rejected() {
        let filter = filter(HostScope::ExactHost);

        assert!(!filter.should_crawl(&url("https://example.com/logo.PNG")));
        assert!(!filter.should_crawl(&url("https://example.com/site.css")));
        assert!(!filter.should_crawl(&url("https://example.com/manual.pdf")));
        assert!(!filter.should_crawl(&url("https://example.com/logo.png?v=2")));
        assert!(!filter.should_crawl(&url("https://example.com/app.js#x")));
        assert!(filter.should_crawl(&url("https://example.com/download?file=a.png")));
        assert!(!filter.should_crawl(&url("mailto:someone@example.com")));
        assert!(!filter.should_crawl(&url("ftp://example.com/file")));
    }

    #[test]
    fn test_regex_patterns() {
        let filter = UrlFilter::new(UrlFilterConfig {
            base_host: "example.com".to_string(),
            scope: HostScope::ExactHost,
            include_patterns: vec![r"/docs/".to_string()],
            exclude_patterns: vec![r"/docs/draft/".to_string()],
        })
        .unwrap();

        assert!(filter.should_crawl(&url("https://example.com/docs/page.html")));
        assert!(!filter.should_crawl(&url("https://example.com/blog/post")));
        assert!(!filter.should_crawl(&url("https://example.com/docs/draft/page.html")));
    }

    #[test]
    fn test_invalid_pattern() {
        let result = UrlFilter::new(UrlFilterConfig {
            base_host: "example.com".to_string(),
            scope: HostScope::ExactHost,
            include_patterns: vec!["(".to_string()],
            exclude_patterns: vec![],
        });
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_normalize_url() {
        let normalized = UrlFilter::normalize_url(&url("HTTPS://Example.COM:443/a?b=1#frag"));
        assert_eq!(normalized.as_str(), "https://example.com/a?b=1");

        assert_eq!(
            UrlFilter::normalize_url(&url("https://example.com")),
            UrlFilter::normalize_url(&url("https://example.com/#top"))
        );
    }
}
