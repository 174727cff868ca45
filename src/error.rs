use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Invalid configuration, detected before any crawling starts
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),

    #[error("base URL {0} has no host")]
    MissingHost(String),

    #[error("page limit must be a positive integer")]
    ZeroPageLimit,

    #[error("page timeout must be at least one second")]
    ZeroTimeout,

    #[error("invalid URL pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single page could not be fetched; the crawl skips it
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("browser command failed while {context} {url}: {source}")]
    Browser {
        url: Url,
        context: &'static str,
        #[source]
        source: fantoccini::error::CmdError,
    },

    #[error("timed out after {secs}s loading {url}")]
    Timeout { url: Url, secs: u64 },

    #[error("{url} is not an HTML document (content type {content_type})")]
    NotHtml { url: Url, content_type: String },

    #[error("{0} does not point to an HTML page")]
    Unsupported(Url),
}

/// Normal termination signal of [`crate::crawlers::frontier::Frontier::next`]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("frontier is empty")]
pub struct EmptyFrontier;

/// The PDF could not be produced; the whole compile is aborted
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("text of {url} contains a character that cannot be rendered ({character:?})")]
    UnrenderableText { url: Url, character: char },

    #[error("renderer failed: {0}")]
    Engine(String),

    #[error("browser command failed while rendering: {0}")]
    Browser(#[from] fantoccini::error::CmdError),

    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize page records: {0}")]
    Json(#[from] serde_json::Error),
}

/// Terminal failures of an archive run
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot connect to any WebDriver server (tried {tried})")]
    NoWebDriver { tried: String },

    #[error("no page of {0} could be fetched")]
    EmptyCrawl(Url),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type Result<T> = std::result::Result<T, Error>;
