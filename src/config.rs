use crate::error::ConfigError;
use crate::filter::{HostScope, UrlFilter, UrlFilterConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration for one archive run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// URL to start crawling from; also defines the crawl scope
    #[serde(default)]
    pub base_url: String,

    /// Maximum number of pages fetched in one crawl
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,

    /// Directory the PDF (and optional JSON export) is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Which hosts count as internal
    #[serde(default)]
    pub scope: HostScope,

    /// Regex patterns for URLs to include
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Upper bound on loading a single page
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Also write the page records as JSON next to the PDF
    #[serde(default)]
    pub write_json: bool,
}

/// A configuration that passed [`ArchiveConfig::validate`]
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub base_url: Url,
    pub page_limit: usize,
    pub output_dir: PathBuf,
    pub webdriver_url: String,
    pub headless: bool,
    pub page_timeout: Duration,
    pub write_json: bool,
    pub filter: UrlFilter,
}

pub const DEFAULT_PAGE_LIMIT: usize = 10;

fn default_page_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_page_timeout_secs() -> u64 {
    45
}

impl ArchiveConfig {
    /// Create a new configuration with default values
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            page_limit: default_page_limit(),
            output_dir: default_output_dir(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            scope: HostScope::default(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            page_timeout_secs: default_page_timeout_secs(),
            write_json: false,
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every option and resolve the base URL and URL filter
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        let base_url =
            Url::parse(self.base_url.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                source,
            })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base_url.scheme().to_string()));
        }
        let host = base_url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ConfigError::MissingHost(base_url.to_string()))?
            .to_string();

        if self.page_limit == 0 {
            return Err(ConfigError::ZeroPageLimit);
        }
        if self.page_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let filter = UrlFilter::new(UrlFilterConfig {
            base_host: host,
            scope: self.scope,
            include_patterns: self.include_patterns.clone(),
            exclude_patterns: self.exclude_patterns.clone(),
        })?;

        Ok(ValidatedConfig {
            base_url: UrlFilter::normalize_url(&base_url),
            page_limit: self.page_limit,
            output_dir: self.output_dir.clone(),
            webdriver_url: self.webdriver_url.clone(),
            headless: self.headless,
            page_timeout: Duration::from_secs(self.page_timeout_secs),
            write_json: self.write_json,
            filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config = ArchiveConfig::from_json(r#"{"base_url": "https://example.com"}"#).unwrap();
        assert_eq!(config.page_limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert!(config.headless);
        assert_eq!(config.scope, HostScope::ExactHost);
        assert!(!config.write_json);
    }

    #[test]
    fn test_missing_base_url_fails_validation() {
        let config = ArchiveConfig::from_json(r#"{"page_limit": 2}"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_scope_from_json() {
        let config = ArchiveConfig::from_json(
            r#"{"base_url": "https://example.com", "scope": "include_subdomains", "page_limit": 3}"#,
        )
        .unwrap();
        assert_eq!(config.scope, HostScope::IncludeSubdomains);
        assert_eq!(config.page_limit, 3);
    }

    #[test]
    fn test_validate_normalizes_base_url() {
        let validated = ArchiveConfig::new("https://Example.com/docs#intro")
            .validate()
            .unwrap();
        assert_eq!(validated.base_url.as_str(), "https://example.com/docs");
        assert_eq!(validated.page_timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_validate_rejects_malformed_url() {
        let err = ArchiveConfig::new("not a url").validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_validate_rejects_other_schemes() {
        let err = ArchiveConfig::new("ftp://example.com").validate().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme(s) if s == "ftp"));
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let mut config = ArchiveConfig::new("https://example.com");
        config.page_limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroPageLimit)));
    }

    #[test]
    fn test_validate_rejects_bad_pattern() {
        let mut config = ArchiveConfig::new("https://example.com");
        config.exclude_patterns.push("([".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.json");
        fs::write(&path, r#"{"base_url": "https://example.com", "write_json": true}"#).unwrap();

        let config = ArchiveConfig::from_file(&path).unwrap();
        assert!(config.write_json);

        let missing = ArchiveConfig::from_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
