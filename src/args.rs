use clap::Parser;
use site2pdf::error::ConfigError;
use site2pdf::{Archiver, HostScope};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site2pdf")]
#[command(about = "Crawls a website and compiles its pages into a single PDF")]
#[command(version)]
pub struct Args {
    /// Base URL to start crawling from
    pub url: String,

    /// Maximum number of pages to fetch [default: 10]
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Directory the PDF is written to [default: output]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// JSON configuration file; command-line flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (defaults to $WEBDRIVER_URL or http://localhost:4444)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Treat subdomains of the base host as internal
    #[arg(long)]
    pub include_subdomains: bool,

    /// Per-page load timeout in seconds [default: 45]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub show_browser: bool,

    /// Also write the extracted pages as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Build the archiver, letting flags override the config file
    pub fn into_archiver(self) -> Result<Archiver, ConfigError> {
        let mut archiver = Archiver::new(&self.url);
        if let Some(path) = &self.config {
            archiver = archiver.with_config_file(path)?;
        }

        // The positional URL always wins over the config file
        let mut config = archiver.config().clone();
        config.base_url = self.url;
        archiver = Archiver::from_config(config);

        if let Some(limit) = self.limit {
            archiver = archiver.with_page_limit(limit);
        }
        if let Some(dir) = self.output_dir {
            archiver = archiver.with_output_dir(dir);
        }
        if let Some(url) = &self.webdriver_url {
            archiver = archiver.with_webdriver_url(url);
        }
        if self.include_subdomains {
            archiver = archiver.with_scope(HostScope::IncludeSubdomains);
        }
        if let Some(secs) = self.timeout {
            archiver = archiver.with_page_timeout(secs);
        }
        if self.show_browser {
            archiver = archiver.with_headless(false);
        }
        if self.json {
            archiver = archiver.with_json_export(true);
        }
        Ok(archiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "site2pdf",
            "https://example.com",
            "--limit",
            "3",
            "--include-subdomains",
            "--json",
        ]);
        let archiver = args.into_archiver().unwrap();
        let config = archiver.config();

        assert_eq!(config.base_url, "https://example.com");
        assert_eq!(config.page_limit, 3);
        assert_eq!(config.scope, HostScope::IncludeSubdomains);
        assert!(config.write_json);
        assert!(config.headless);
    }

    #[test]
    fn test_zero_limit_is_rejected_at_validation() {
        let args = Args::parse_from(["site2pdf", "https://example.com", "-l", "0"]);
        let archiver = args.into_archiver().unwrap();
        assert!(matches!(archiver.validate(), Err(ConfigError::ZeroPageLimit)));
    }

    #[test]
    fn test_negative_limit_is_rejected_by_parser() {
        let result = Args::try_parse_from(["site2pdf", "https://example.com", "--limit", "-2"]);
        assert!(result.is_err());
    }
}
