use crate::filter::UrlFilter;
use serde::{Deserialize, Serialize};
use url::Url;

/// Content returned by the browser for one HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// Raw page source
    Markup(String),
    /// Text of `<body>` as rendered by the browser, when the source could not be read
    PlainText(String),
}

/// A page as loaded by a [`crate::crawlers::fetcher::PageFetcher`]
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: Url,

    /// URL the browser ended up on after redirects
    pub final_url: Url,

    pub content: PageContent,

    /// Text of `<body>` as rendered by the browser, if available
    pub rendered_text: Option<String>,
}

impl FetchedPage {
    /// A page that was not redirected and has no rendered text
    pub fn new(url: Url, content: PageContent) -> Self {
        Self {
            final_url: url.clone(),
            url,
            content,
            rendered_text: None,
        }
    }

    /// True if the browser landed on another URL; fragments are ignored
    pub fn was_redirected(&self) -> bool {
        UrlFilter::normalize_url(&self.url) != UrlFilter::normalize_url(&self.final_url)
    }
}

/// Heading texts of one page, grouped by level in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
}

impl Headings {
    /// Adds a heading of level 1 to 5; other levels are ignored
    pub fn push(&mut self, level: u8, text: String) {
        match level {
            1 => self.h1.push(text),
            2 => self.h2.push(text),
            3 => self.h3.push(text),
            4 => self.h4.push(text),
            5 => self.h5.push(text),
            _ => {}
        }
    }

    /// Every heading, level by level
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.h1
            .iter()
            .chain(&self.h2)
            .chain(&self.h3)
            .chain(&self.h4)
            .chain(&self.h5)
    }
}

/// One successfully fetched page: the unit that becomes a PDF section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// URL of the page
    pub url: Url,

    /// Title of the page (if available)
    pub title: Option<String>,

    pub headings: Headings,

    /// Extracted main text; paragraphs are separated by a blank line
    pub text: String,
}

impl PageRecord {
    pub fn new(url: Url, title: Option<String>, headings: Headings, text: String) -> Self {
        Self {
            url,
            title,
            headings,
            text,
        }
    }

    /// First hundred characters of the text, for log lines
    pub fn summary(&self) -> &str {
        match self.text.char_indices().nth(100) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }
}

/// Pages of one crawl in visitation order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlResult {
    pub records: Vec<PageRecord>,

    /// URLs whose fetch failed and were skipped
    pub failed: Vec<Url>,
}

impl CrawlResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn urls(&self) -> impl Iterator<Item = &Url> {
        self.records.iter().map(|r| &r.url)
    }
}

/// Collects page records in the order the crawler hands them over
#[derive(Debug, Default)]
pub struct ContentAggregator {
    result: CrawlResult,
}

impl ContentAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PageRecord) {
        ::log::debug!("Aggregated page {}: {}", self.result.records.len() + 1, record.url);
        self.result.records.push(record);
    }

    pub fn push_failure(&mut self, url: Url) {
        self.result.failed.push(url);
    }

    pub fn len(&self) -> usize {
        self.result.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.result.records.is_empty()
    }

    pub fn finish(self) -> CrawlResult {
        self.result
    }
}
