use crate::error::RenderError;
use crate::parsers::text;
use crate::results::PageRecord;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

const STYLE: &str = "\
body { font-family: Georgia, serif; font-size: 11pt; line-height: 1.45; margin: 0; }
section.page { page-break-before: always; }
section.page:first-of-type { page-break-before: auto; }
h1.source a { color: inherit; text-decoration: none; }
h1.source { font-family: Helvetica, Arial, sans-serif; font-size: 10pt; color: #555; word-break: break-all; border-bottom: 1px solid #ccc; padding-bottom: 4pt; }
h2.title { font-size: 16pt; margin: 8pt 0; }
p { margin: 0 0 8pt 0; text-align: justify; }
";

/// Builds the HTML document handed to the PDF renderer, one section per page
pub fn build(records: &[PageRecord]) -> Result<String, RenderError> {
    let doc_title = records
        .first()
        .and_then(|r| r.url.host_str())
        .map(|host| format!("Archive of {host}"))
        .unwrap_or_else(|| "Site archive".to_string());

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", encode_text(&doc_title));
    let _ = writeln!(html, "<style>\n{STYLE}</style>\n</head>\n<body>");

    for record in records {
        check_renderable(record)?;
        html.push_str(&section(record));
    }

    html.push_str("</body>\n</html>\n");
    Ok(html)
}

fn section(record: &PageRecord) -> String {
    let mut out = String::from("<section class=\"page\">\n");
    let url = record.url.as_str();
    let _ = writeln!(
        out,
        "<h1 class=\"source\"><a href=\"{}\">{}</a></h1>",
        encode_double_quoted_attribute(url),
        encode_text(url)
    );

    if let Some(title) = &record.title {
        let _ = writeln!(out, "<h2 class=\"title\">{}</h2>", encode_text(title));
    }
    for paragraph in text::paragraphs(&record.text) {
        let _ = writeln!(out, "<p>{}</p>", encode_text(&paragraph));
    }

    out.push_str("</section>\n");
    out
}

/// Rejects characters that cannot appear in an HTML document
fn check_renderable(record: &PageRecord) -> Result<(), RenderError> {
    let fields = std::iter::once(record.text.as_str())
        .chain(record.title.as_deref())
        .chain(record.headings.iter().map(String::as_str));

    for field in fields {
        if let Some(character) = field.chars().find(|&c| is_unrenderable(c)) {
            return Err(RenderError::UnrenderableText {
                url: record.url.clone(),
                character,
            });
        }
    }
    Ok(())
}

fn is_unrenderable(c: char) -> bool {
    (c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r')) || matches!(c, '\u{fffe}' | '\u{ffff}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Headings;
    use url::Url;

    fn record(path: &str, title: Option<&str>, text: &str) -> PageRecord {
        PageRecord::new(
            Url::parse("https://example.com").unwrap().join(path).unwrap(),
            title.map(str::to_string),
            Headings::default(),
            text.to_string(),
        )
    }

    #[test]
    fn test_one_section_per_record_in_order() {
        let html = build(&[
            record("/", Some("Home"), "Welcome.\n\nSecond paragraph."),
            record("/about", None, "About us."),
        ])
        .unwrap();

        assert_eq!(html.matches("<section class=\"page\">").count(), 2);
        assert!(html.contains("<title>Archive of example.com</title>"));

        let home = html.find(">https://example.com/</a></h1>").unwrap();
        let about = html.find(">https://example.com/about</a></h1>").unwrap();
        assert!(home < about);

        assert!(html.contains("<h2 class=\"title\">Home</h2>"));
        assert!(html.contains("<p>Welcome.</p>\n<p>Second paragraph.</p>"));
        assert!(html.contains("<p>About us.</p>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let html = build(&[record(
            "/search?q=a&b=c",
            Some("<script>alert('x')</script>"),
            "Use <b> & \"quotes\"",
        )])
        .unwrap();

        assert!(html.contains("href=\"https://example.com/search?q=a&amp;b=c\""));
        assert!(html.contains(">https://example.com/search?q=a&amp;b=c</a>"));
        assert!(html.contains("<h2 class=\"title\">&lt;script&gt;alert("));
        assert!(html.contains("<p>Use &lt;b&gt; &amp; "));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_control_characters_abort() {
        let err = build(&[
            record("/", None, "fine"),
            record("/bad", None, "broken \u{0} text"),
        ])
        .unwrap_err();

        match err {
            RenderError::UnrenderableText { url, character } => {
                assert_eq!(url.path(), "/bad");
                assert_eq!(character, '\u{0}');
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_control_characters_in_headings_abort() {
        let mut bad = record("/", Some("Title"), "fine");
        bad.headings.push(4, "Step\u{1b}[0m".to_string());

        assert!(matches!(
            build(&[bad]),
            Err(RenderError::UnrenderableText { character: '\u{1b}', .. })
        ));
    }

    #[test]
    fn test_whitespace_controls_are_allowed() {
        assert!(build(&[record("/", None, "tab\there\r\nnext")]).is_ok());
    }

    #[test]
    fn test_empty_document() {
        let html = build(&[]).unwrap();
        assert!(html.contains("<title>Site archive</title>"));
        assert!(!html.contains("<section"));
    }
}
