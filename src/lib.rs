pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod parsers;
pub mod pdf;
pub mod results;

// Re-export commonly used types for convenience
pub use config::ArchiveConfig;
pub use error::{Error, Result};
pub use filter::HostScope;
pub use results::{CrawlResult, PageRecord};

use config::ValidatedConfig;
use crawlers::browser::BrowserSession;
use crawlers::fetcher::{PageFetcher, WebDriverFetcher};
use crawlers::web::WebCrawler;
use pdf::webdriver::WebDriverRenderer;
use pdf::{PdfCompiler, PdfRenderer};
use std::path::{Path, PathBuf};

/// Files produced by one archive run
#[derive(Debug, Clone)]
pub struct ArchiveOutput {
    pub pdf_path: PathBuf,
    pub json_path: Option<PathBuf>,
    /// Pages included in the PDF
    pub pages: usize,
    /// Pages skipped because they failed to load
    pub failed: usize,
}

/// Main builder: crawl a site and compile it into a PDF
pub struct Archiver {
    config: ArchiveConfig,
    webdriver_override: Option<String>,
}

impl Archiver {
    /// Create a new Archiver with default settings for `base_url`
    pub fn new(base_url: &str) -> Self {
        Self::from_config(ArchiveConfig::new(base_url))
    }

    pub fn from_config(config: ArchiveConfig) -> Self {
        Self {
            config,
            webdriver_override: None,
        }
    }

    /// Load configuration from a JSON file; a non-empty base URL in the file wins
    pub fn with_config_file(self, path: impl AsRef<Path>) -> std::result::Result<Self, error::ConfigError> {
        let loaded = ArchiveConfig::from_file(path)?;
        Ok(self.merge_config(loaded))
    }

    /// Load configuration from a JSON string; a non-empty base URL in it wins
    pub fn with_config_str(self, json: &str) -> std::result::Result<Self, error::ConfigError> {
        let loaded = ArchiveConfig::from_json(json)?;
        Ok(self.merge_config(loaded))
    }

    fn merge_config(mut self, mut loaded: ArchiveConfig) -> Self {
        if loaded.base_url.trim().is_empty() {
            loaded.base_url = std::mem::take(&mut self.config.base_url);
        }
        self.config = loaded;
        self
    }

    /// Set the maximum number of pages fetched
    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.config.page_limit = page_limit;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = output_dir.into();
        self
    }

    /// Use this WebDriver server, ignoring `WEBDRIVER_URL`
    pub fn with_webdriver_url(mut self, webdriver_url: &str) -> Self {
        self.webdriver_override = Some(webdriver_url.to_string());
        self
    }

    pub fn with_scope(mut self, scope: HostScope) -> Self {
        self.config.scope = scope;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set the per-page load timeout
    pub fn with_page_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.page_timeout_secs = timeout_seconds;
        self
    }

    pub fn with_json_export(mut self, enabled: bool) -> Self {
        self.config.write_json = enabled;
        self
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Validate the configuration with the WebDriver URL resolved
    pub fn validate(&self) -> std::result::Result<ValidatedConfig, error::ConfigError> {
        let mut config = self.config.clone();

        // Override the WebDriver URL with an environment variable if provided
        if let Some(url) = &self.webdriver_override {
            config.webdriver_url = url.clone();
        } else if let Ok(url) = std::env::var("WEBDRIVER_URL") {
            if !url.is_empty() {
                config.webdriver_url = url;
            }
        }

        config.validate()
    }

    /// Crawl the site in a browser session and write the PDF
    pub async fn run(self) -> Result<ArchiveOutput> {
        let config = self.validate()?;

        let session = BrowserSession::connect(&config.webdriver_url, config.headless).await?;
        let webdriver_url = session.webdriver_url().to_string();

        let result = {
            let fetcher = WebDriverFetcher::new(&session, config.page_timeout);
            WebCrawler::from_config(&config).crawl(&fetcher).await
        };
        session.close().await;

        let renderer = WebDriverRenderer::new(&webdriver_url, config.headless);
        compile(&config, result, &renderer).await
    }
}

/// Crawl with the given fetcher and compile with the given renderer
pub async fn archive<F, R>(config: &ValidatedConfig, fetcher: &F, renderer: &R) -> Result<ArchiveOutput>
where
    F: PageFetcher + ?Sized,
    R: PdfRenderer + ?Sized,
{
    let result = WebCrawler::from_config(config).crawl(fetcher).await;
    compile(config, result, renderer).await
}

async fn compile<R: PdfRenderer + ?Sized>(
    config: &ValidatedConfig,
    result: CrawlResult,
    renderer: &R,
) -> Result<ArchiveOutput> {
    if result.is_empty() {
        return Err(Error::EmptyCrawl(config.base_url.clone()));
    }
    let failed = result.failed.len();

    let compiled = PdfCompiler::new(&config.output_dir)
        .with_json_export(config.write_json)
        .compile(result, renderer)
        .await?;

    Ok(ArchiveOutput {
        pdf_path: compiled.pdf_path,
        json_path: compiled.json_path,
        pages: compiled.pages,
        failed,
    })
}
