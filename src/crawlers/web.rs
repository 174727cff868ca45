use crate::config::ValidatedConfig;
use crate::crawlers::fetcher::PageFetcher;
use crate::crawlers::frontier::Frontier;
use crate::crawlers::links;
use crate::error::EmptyFrontier;
use crate::filter::UrlFilter;
use crate::parsers::Parser;
use crate::results::{ContentAggregator, CrawlResult, PageContent, PageRecord};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CrawlState {
    Running,
    Done,
}

/// Bounded breadth-first crawl of one site
#[derive(Debug, Clone)]
pub struct WebCrawler {
    base_url: Url,
    page_limit: usize,
    filter: UrlFilter,
}

impl WebCrawler {
    pub fn new(base_url: Url, page_limit: usize, filter: UrlFilter) -> Self {
        Self {
            base_url: UrlFilter::normalize_url(&base_url),
            page_limit,
            filter,
        }
    }

    pub fn from_config(config: &ValidatedConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            config.page_limit,
            config.filter.clone(),
        )
    }

    /// Crawls from the base URL until the page limit is reached or no links remain.
    ///
    /// Pages that fail to load are skipped; the crawl itself never fails.
    pub async fn crawl<F: PageFetcher + ?Sized>(&self, fetcher: &F) -> CrawlResult {
        ::log::info!(
            "Starting crawl of {} (limit {} pages)",
            self.base_url,
            self.page_limit
        );

        let mut frontier = Frontier::new();
        frontier.offer(self.base_url.clone());
        let mut aggregator = ContentAggregator::new();

        let mut state = CrawlState::Running;
        while state == CrawlState::Running {
            state = self.step(fetcher, &mut frontier, &mut aggregator).await;
        }

        let result = aggregator.finish();
        ::log::info!(
            "Crawl complete - {} pages collected, {} failed, {} links left unvisited",
            result.len(),
            result.failed.len(),
            frontier.len()
        );
        result
    }

    async fn step<F: PageFetcher + ?Sized>(
        &self,
        fetcher: &F,
        frontier: &mut Frontier,
        aggregator: &mut ContentAggregator,
    ) -> CrawlState {
        if frontier.count() >= self.page_limit {
            ::log::info!("Page limit of {} reached", self.page_limit);
            return CrawlState::Done;
        }

        let url = match frontier.next() {
            Ok(url) => url,
            Err(EmptyFrontier) => {
                ::log::debug!("No more URLs to visit");
                return CrawlState::Done;
            }
        };

        ::log::info!(
            "Scraping URL {} of at most {}: {}",
            frontier.count() + 1,
            self.page_limit,
            url
        );
        let fetched = fetcher.fetch(&url).await;
        frontier.mark_visited(&url);

        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                ::log::warn!("Skipping {}: {}", url, e);
                aggregator.push_failure(url);
                return CrawlState::Running;
            }
        };

        let final_url = UrlFilter::normalize_url(&page.final_url);
        if page.was_redirected() {
            if !self.filter.is_in_scope(&final_url) {
                ::log::warn!("Skipping {}: redirected outside the site to {}", url, final_url);
                aggregator.push_failure(url);
                return CrawlState::Running;
            }
            if frontier.is_visited(&final_url) {
                ::log::info!("Skipping {}: redirected to already visited {}", url, final_url);
                return CrawlState::Running;
            }
            frontier.mark_alias(&final_url);
        }

        let parsed = Parser::parse(&page.content, page.rendered_text.as_deref());
        let discovered = match page.content {
            PageContent::Markup(_) => links::extract_links(&parsed, &final_url, &self.filter),
            PageContent::PlainText(_) => Vec::new(),
        };

        let record = PageRecord::new(url, parsed.title, parsed.headings, parsed.content);
        ::log::debug!("Extracted from {}: {:?}", record.url, record.summary());
        aggregator.push(record);

        let found = discovered.len();
        let queued = discovered
            .into_iter()
            .filter(|link| frontier.offer(link.clone()))
            .count();
        ::log::debug!("Queued {} of {} discovered links", queued, found);

        CrawlState::Running
    }
}
