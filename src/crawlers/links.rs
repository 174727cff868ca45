use crate::filter::UrlFilter;
use crate::parsers::{ParseResult, html};
use std::collections::HashSet;
use url::Url;

/// Resolves the raw links of a parsed page into crawlable URLs.
///
/// Relative links resolve against `<base href>` when the page has one.
/// Links that do not resolve, use another scheme or leave the crawl scope are
/// dropped. The result keeps document order with duplicates removed.
pub fn extract_links(parsed: &ParseResult, page_url: &Url, filter: &UrlFilter) -> Vec<Url> {
    let base = parsed
        .base_href
        .as_deref()
        .and_then(|href| page_url.join(href).ok())
        .unwrap_or_else(|| page_url.clone());

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in &parsed.links {
        let resolved = match base.join(href) {
            Ok(resolved) => resolved,
            Err(e) => {
                ::log::trace!("Dropping unresolvable link {:?} on {}: {}", href, page_url, e);
                continue;
            }
        };

        if !filter.should_crawl(&resolved) {
            ::log::trace!("URL filter rejected: {}", resolved);
            continue;
        }

        let normalized = UrlFilter::normalize_url(&resolved);
        if seen.insert(normalized.clone()) {
            links.push(normalized);
        }
    }

    ::log::debug!("Kept {} of {} links on {}", links.len(), parsed.links.len(), page_url);
    links
}

/// Same as [`extract_links`] for a page that has not been parsed yet
pub fn extract_links_from_html(source: &str, page_url: &Url, filter: &UrlFilter) -> Vec<Url> {
    extract_links(&html::parse(source), page_url, filter)
}
