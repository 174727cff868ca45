use crate::parsers::ParseResult;
use crate::parsers::text::normalize_whitespace_in_segment;
use crate::results::Headings;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static HEADINGS: LazyLock<Selector> = LazyLock::new(|| selector("h1, h2, h3, h4, h5"));
static BASE: LazyLock<Selector> = LazyLock::new(|| selector("base[href]"));
static LINKS: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));
static BLOCKS: LazyLock<Selector> = LazyLock::new(|| {
    selector("h1, h2, h3, h4, h5, h6, p, li, pre, blockquote, dt, dd, th, td, figcaption")
});

/// Containers tried in order when looking for the main content
static MAIN_CANDIDATES: LazyLock<[Selector; 4]> = LazyLock::new(|| {
    ["main", "article", "[role=main]", "#content"].map(selector)
});

/// Elements whose text never belongs to the page body
const NEVER_TEXT: [&str; 7] = [
    "script", "style", "noscript", "template", "svg", "iframe", "button",
];

/// Page chrome around the main text
const CHROME: [&str; 6] = ["nav", "header", "footer", "aside", "form", "menu"];

const BLOCK_TAGS: [&str; 15] = [
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "li", "pre", "blockquote", "dt", "dd", "th",
    "td", "figcaption",
];

/// Parses HTML content to extract title, headings, main text and links
pub fn parse(html: &str) -> ParseResult {
    let doc = Html::parse_document(html);

    let links = extract_hrefs(&doc);
    ::log::debug!("HTML parser found {} links", links.len());

    let (content, headings) = match content_root(&doc) {
        Some(root) => (main_text(root), headings(root)),
        None => (String::new(), Headings::default()),
    };

    let title = doc
        .select(&TITLE)
        .next()
        .map(|t| normalize_whitespace_in_segment(&t.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .or_else(|| headings.h1.first().cloned());

    let base_href = doc
        .select(&BASE)
        .next()
        .and_then(|b| b.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty());

    ParseResult {
        title,
        headings,
        content,
        links,
        base_href,
    }
}

fn extract_hrefs(doc: &Html) -> Vec<String> {
    doc.select(&LINKS)
        .filter_map(|e| e.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}

/// Picks the element most likely to hold the page's main text
fn content_root(doc: &Html) -> Option<ElementRef<'_>> {
    MAIN_CANDIDATES
        .iter()
        .find_map(|candidate| {
            doc.select(candidate)
                .find(|el| !element_text(*el).is_empty())
        })
        .or_else(|| doc.select(&BODY).next())
}

/// Text of every outermost block inside `root`, one paragraph per block.
///
/// Falls back to all text under `root` when the page has no block markup.
fn main_text(root: ElementRef<'_>) -> String {
    let paragraphs: Vec<String> = root
        .select(&BLOCKS)
        .filter(|el| !is_skipped(*el, root) && !has_block_ancestor(*el, root))
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();

    if paragraphs.is_empty() {
        element_text(root)
    } else {
        paragraphs.join("\n\n")
    }
}

/// Headings h1 to h5 under `root`, grouped by level
fn headings(root: ElementRef<'_>) -> Headings {
    let mut headings = Headings::default();
    for el in root.select(&HEADINGS).filter(|el| !is_skipped(*el, root)) {
        let text = element_text(el);
        if text.is_empty() {
            continue;
        }
        let level = el.value().name()[1..].parse().unwrap_or(0);
        headings.push(level, text);
    }
    headings
}

/// Whitespace-normalized text under `el`, leaving out scripts, styles and page chrome
fn element_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(el, &mut out);
    normalize_whitespace_in_segment(&out)
}

fn collect_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                out.push(' ');
                out.push_str(text);
            }
            Node::Element(element) if is_dropped(element.name()) => {}
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, out);
                }
            }
            _ => {}
        }
    }
}

fn is_dropped(name: &str) -> bool {
    NEVER_TEXT.contains(&name) || CHROME.contains(&name)
}

/// True if `el` or one of its ancestors below `root` is dropped
fn is_skipped(el: ElementRef<'_>, root: ElementRef<'_>) -> bool {
    std::iter::once(*el)
        .chain(el.ancestors())
        .take_while(|node| node.id() != root.id())
        .filter_map(|node| node.value().as_element())
        .any(|element| is_dropped(element.name()))
}

fn has_block_ancestor(el: ElementRef<'_>, root: ElementRef<'_>) -> bool {
    el.ancestors()
        .take_while(|a| a.id() != root.id())
        .filter_map(|a| a.value().as_element())
        .any(|e| BLOCK_TAGS.contains(&e.name()))
}
