use crate::parsers::{Parser, ParserType};
use crate::results::PageContent;
use url::Url;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[test]
fn test_parser_type_from_url() {
    assert_eq!(ParserType::from_url(&url("https://example.com/")), ParserType::Html);
    assert_eq!(ParserType::from_url(&url("https://example.com/page.html")), ParserType::Html);
    assert_eq!(ParserType::from_url(&url("https://example.com/v1.2/guide")), ParserType::Html);
    assert_eq!(ParserType::from_url(&url("https://example.com/notes.TXT")), ParserType::Asset);
    assert_eq!(ParserType::from_url(&url("https://example.com/logo.png")), ParserType::Asset);
    assert_eq!(ParserType::from_url(&url("https://example.com/file.pdf?x=1")), ParserType::Asset);
    assert_eq!(ParserType::from_url(&url("https://example.com/app.js#main")), ParserType::Asset);
    assert_eq!(ParserType::from_url(&url("https://example.com/?file=logo.png")), ParserType::Html);
}

#[test]
fn test_parser_type_from_content_type() {
    assert_eq!(ParserType::from_content_type("text/html; charset=utf-8"), Some(ParserType::Html));
    assert_eq!(ParserType::from_content_type("application/xhtml+xml"), Some(ParserType::Html));
    assert_eq!(ParserType::from_content_type("text/plain"), None);
    assert_eq!(ParserType::from_content_type("image/png"), None);
    assert_eq!(ParserType::from_content_type("application/pdf"), None);
}

#[test]
fn test_parse_markup() {
    let content = PageContent::Markup(
        "<html><body><p>Hello, world!</p><a href=\"https://example.com\">Link</a></body></html>"
            .to_string(),
    );
    let result = Parser::parse(&content, None);
    assert_eq!(result.content, "Hello, world!");
    assert_eq!(result.links, vec!["https://example.com"]);
}

#[test]
fn test_parse_markup_falls_back_to_rendered_text() {
    let content = PageContent::Markup("<html><body><div id=\"app\"></div></body></html>".to_string());
    let result = Parser::parse(&content, Some("Rendered by\nscript.\n\nSecond block."));
    assert_eq!(result.content, "Rendered by script.\n\nSecond block.");
}

#[test]
fn test_rendered_text_ignored_when_markup_has_text() {
    let content = PageContent::Markup("<html><body><p>From markup.</p></body></html>".to_string());
    let result = Parser::parse(&content, Some("From the browser."));
    assert_eq!(result.content, "From markup.");
}

#[test]
fn test_parse_plain_text() {
    let content = PageContent::PlainText("Line 1\nLine 2\n\n\nLine 3 <a href=\"/x\">".to_string());
    let result = Parser::parse(&content, Some("ignored"));
    assert_eq!(result.content, "Line 1 Line 2\n\nLine 3 <a href=\"/x\">");
    assert!(result.links.is_empty());
    assert_eq!(result.title, None);
}
