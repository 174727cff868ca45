use crate::crawlers::browser::BrowserSession;
use crate::error::RenderError;
use crate::pdf::PdfRenderer;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use fantoccini::Client;
use fantoccini::error::CmdError;
use serde_json::{Value, json};
use webdriver::command::{PrintParameters, VoidWebDriverExtensionCommand, WebDriverCommand};

const WRITE_DOCUMENT: &str = "document.open(); document.write(arguments[0]); document.close();";

/// Renders HTML to PDF with the WebDriver "Print Page" command
pub struct WebDriverRenderer {
    webdriver_url: String,
    headless: bool,
}

impl WebDriverRenderer {
    pub fn new(webdriver_url: &str, headless: bool) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            headless,
        }
    }
}

#[async_trait]
impl PdfRenderer for WebDriverRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        // Printing needs a browser window, so rendering always uses a fresh session
        let session = BrowserSession::connect(&self.webdriver_url, self.headless)
            .await
            .map_err(|e| RenderError::Engine(e.to_string()))?;

        let printed = print_document(session.client(), html).await;
        session.close().await;
        printed
    }
}

async fn print_document(client: &Client, html: &str) -> Result<Vec<u8>, RenderError> {
    client.goto("about:blank").await?;
    client.execute(WRITE_DOCUMENT, vec![json!(html)]).await?;

    let params = PrintParameters {
        background: true,
        ..PrintParameters::default()
    };
    let printed = client
        .issue_cmd(WebDriverCommand::<VoidWebDriverExtensionCommand>::Print(params))
        .await?;

    let pdf = decode_pdf(printed)?;
    ::log::debug!("Browser printed {} bytes of PDF", pdf.len());
    Ok(pdf)
}

/// The Print command answers with the PDF as a base64 string
fn decode_pdf(printed: Value) -> Result<Vec<u8>, RenderError> {
    let Some(encoded) = printed.as_str() else {
        return Err(CmdError::NotW3C(printed).into());
    };
    STANDARD
        .decode(encoded)
        .map_err(|e| RenderError::Engine(format!("browser returned malformed PDF data: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_pdf() {
        let encoded = STANDARD.encode(b"%PDF-1.7\n%%EOF\n");
        let pdf = decode_pdf(Value::String(encoded)).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_decode_pdf_rejects_non_string() {
        let err = decode_pdf(json!({"data": "JVBERg=="})).unwrap_err();
        assert!(matches!(err, RenderError::Browser(CmdError::NotW3C(_))));
    }

    #[test]
    fn test_decode_pdf_rejects_bad_base64() {
        let err = decode_pdf(json!("not base64!")).unwrap_err();
        assert!(matches!(err, RenderError::Engine(_)));
    }
}
