use crate::crawlers::browser::BrowserSession;
use crate::error::FetchError;
use crate::filter::UrlFilter;
use crate::parsers::ParserType;
use crate::results::{FetchedPage, PageContent};
use async_trait::async_trait;
use fantoccini::Locator;
use fantoccini::error::CmdError;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use url::Url;

/// Loads one page at a time for the crawler
#[async_trait]
pub trait PageFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Fetches pages by driving a real browser through WebDriver
pub struct WebDriverFetcher<'a> {
    session: &'a BrowserSession,
    page_timeout: Duration,
}

impl<'a> WebDriverFetcher<'a> {
    pub fn new(session: &'a BrowserSession, page_timeout: Duration) -> Self {
        Self {
            session,
            page_timeout,
        }
    }

    async fn load(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let client = self.session.client();
        let browser_error = move |context: &'static str| {
            move |source: CmdError| FetchError::Browser {
                url: url.clone(),
                context,
                source,
            }
        };

        client
            .goto(url.as_str())
            .await
            .map_err(browser_error("navigating to"))?;

        let body = client
            .wait()
            .at_most(self.page_timeout)
            .for_element(Locator::Css("body"))
            .await
            .map_err(browser_error("waiting for the body of"))?;

        let content_type = client
            .execute("return document.contentType;", Vec::new())
            .await
            .map_err(browser_error("reading the content type of"))?;
        let content_type = content_type.as_str().unwrap_or("text/html").to_string();

        let final_url = match client.current_url().await {
            Ok(current) => UrlFilter::normalize_url(&current),
            Err(e) => {
                ::log::debug!("Could not read current URL after loading {}: {}", url, e);
                url.clone()
            }
        };

        if ParserType::from_content_type(&content_type) != Some(ParserType::Html) {
            return Err(FetchError::NotHtml {
                url: url.clone(),
                content_type,
            });
        }

        let rendered_text = body
            .text()
            .await
            .map_err(browser_error("reading the text of"))?;

        let content = match client.source().await {
            Ok(source) => PageContent::Markup(source),
            Err(e) => {
                ::log::warn!("No page source for {}, keeping its rendered text: {}", url, e);
                PageContent::PlainText(rendered_text.clone())
            }
        };

        Ok(FetchedPage {
            url: url.clone(),
            final_url,
            content,
            rendered_text: Some(rendered_text),
        })
    }
}

#[async_trait]
impl<'a> PageFetcher for WebDriverFetcher<'a> {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        if ParserType::from_url(url) == ParserType::Asset {
            return Err(FetchError::Unsupported(url.clone()));
        }

        let started = Instant::now();
        match timeout(self.page_timeout, self.load(url)).await {
            Ok(result) => {
                ::log::debug!(
                    "Loaded {} in {:.2} seconds",
                    url,
                    started.elapsed().as_secs_f64()
                );
                result
            }
            Err(_) => Err(FetchError::Timeout {
                url: url.clone(),
                secs: self.page_timeout.as_secs(),
            }),
        }
    }
}
