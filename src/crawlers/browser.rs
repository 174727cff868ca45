use crate::error::Error;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;

/// Ports WebDriver servers commonly listen on, tried when the configured one is unreachable
const FALLBACK_URLS: [&str; 3] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // Selenium / geckodriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// One WebDriver session, held for the lifetime of a crawl or a render.
///
/// The session must be released with [`BrowserSession::close`]; dropping it
/// leaves the browser process running until the WebDriver server reaps it.
pub struct BrowserSession {
    client: Client,
    webdriver_url: String,
}

impl BrowserSession {
    /// Connects to the WebDriver at `webdriver_url`, falling back to common local ports
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, Error> {
        let mut tried = Vec::new();
        let candidates = std::iter::once(webdriver_url)
            .chain(FALLBACK_URLS.iter().copied().filter(|u| *u != webdriver_url));

        for url in candidates {
            match ClientBuilder::native()
                .capabilities(capabilities(headless))
                .connect(url)
                .await
            {
                Ok(client) => {
                    ::log::debug!("Connected to WebDriver at {}", url);
                    return Ok(Self {
                        client,
                        webdriver_url: url.to_string(),
                    });
                }
                Err(e) => {
                    if tried.is_empty() {
                        ::log::warn!("Failed to connect to WebDriver at {}: {}", url, e);
                    } else {
                        ::log::debug!("Fallback WebDriver at {} unavailable: {}", url, e);
                    }
                    tried.push(url.to_string());
                }
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(Error::NoWebDriver {
            tried: tried.join(", "),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn webdriver_url(&self) -> &str {
        &self.webdriver_url
    }

    /// Ends the session and shuts down its browser
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        } else {
            ::log::debug!("Closed WebDriver session at {}", self.webdriver_url);
        }
    }
}

/// Browser capabilities for Chrome and Firefox; each driver ignores the other's options
fn capabilities(headless: bool) -> Capabilities {
    let mut chrome_args = vec!["--no-sandbox", "--disable-dev-shm-usage", "--disable-gpu"];
    let mut firefox_args = Vec::new();
    if headless {
        chrome_args.push("--headless=new");
        firefox_args.push("-headless");
    }

    let caps = json!({
        "goog:chromeOptions": {
            "args": chrome_args,
            "prefs": {
                "download.prompt_for_download": false,
                "profile.managed_default_content_settings.images": 2,
            },
        },
        "moz:firefoxOptions": {
            "args": firefox_args,
        },
    });

    match caps {
        serde_json::Value::Object(map) => map,
        _ => Capabilities::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_capabilities() {
        let caps = capabilities(true);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless=new"));
        assert_eq!(caps["moz:firefoxOptions"]["args"][0], "-headless");
    }

    #[test]
    fn test_visible_browser_capabilities() {
        let caps = capabilities(false);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a.as_str().unwrap().contains("headless")));
        assert!(caps["moz:firefoxOptions"]["args"].as_array().unwrap().is_empty());
    }
}
