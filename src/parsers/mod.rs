pub mod html;
pub mod text;

#[cfg(test)]
mod tests;

use crate::results::{Headings, PageContent};
use url::Url;

/// Enum to represent different types of content parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserType {
    /// HTML parser
    Html,
    /// Documents with no page markup: images, styles, scripts, fonts, archives, plain text
    Asset,
}

impl ParserType {
    /// Classifies a URL by its path extension before it is loaded.
    ///
    /// Only the path is looked at, so query strings and fragments do not hide the extension.
    pub fn from_url(url: &Url) -> Self {
        let path = url.path().to_ascii_lowercase();
        let file_name = path.rsplit('/').next().unwrap_or("");
        let extension = file_name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");

        let parser_type = match extension {
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp" | "ico" | "svg" | "css" | "js"
            | "woff" | "woff2" | "ttf" | "eot" | "pdf" | "zip" | "gz" | "tar" | "mp3" | "mp4"
            | "avi" | "mov" | "txt" | "csv" => ParserType::Asset,
            _ => ParserType::Html,
        };
        ::log::trace!("Classifying {} as {:?}", url, parser_type);
        parser_type
    }

    /// Classifies a loaded document by its MIME type; `None` for anything but HTML
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "text/html" | "application/xhtml+xml" => Some(ParserType::Html),
            _ => None,
        }
    }
}

/// Result of parsing content
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Document title, if the document has one
    pub title: Option<String>,
    /// Headings h1 to h5 of the main content
    pub headings: Headings,
    /// Extracted text content; paragraphs separated by a blank line
    pub content: String,
    /// Raw `href` values of the document's links
    pub links: Vec<String>,
    /// Value of `<base href>`, used to resolve relative links
    pub base_href: Option<String>,
}

/// Main parser that delegates to the HTML or text parser
pub struct Parser;

impl Parser {
    /// Parse fetched page content.
    ///
    /// When the markup yields no text, the browser's rendered text is used
    /// instead, which covers pages built entirely by scripts.
    pub fn parse(content: &PageContent, rendered_text: Option<&str>) -> ParseResult {
        match content {
            PageContent::Markup(source) => {
                let mut result = html::parse(source);
                if result.content.is_empty() {
                    if let Some(rendered) = rendered_text {
                        ::log::debug!("Markup yielded no text, using rendered text");
                        result.content = text::paragraphs(rendered).join("\n\n");
                    }
                }
                result
            }
            PageContent::PlainText(body) => ParseResult {
                content: text::paragraphs(body).join("\n\n"),
                ..ParseResult::default()
            },
        }
    }
}
