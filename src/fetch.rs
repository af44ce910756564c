use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use tracing::{debug, error};

/// Desktop browser user agent; the article host serves a stripped page to
/// unknown clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/83.0.3497.92 Safari/537.36";

/// Source of article page bodies.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` once. `None` means no usable content; the cause has
    /// already been logged.
    async fn fetch(&self, url: &str) -> Option<String>;
}

/// Plain HTTP GET, no retries, transport default timeouts.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        debug!("Fetching page: {}", url);

        let response = match self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Error on get page {}: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            error!("Error on get page {}: status {}", url, status);
            return None;
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                error!("Error reading page body {}: {}", url, e);
                return None;
            }
        };

        match String::from_utf8(body.to_vec()) {
            Ok(text) => Some(text),
            Err(e) => {
                error!("Page {} is not valid UTF-8: {}", url, e);
                None
            }
        }
    }
}
