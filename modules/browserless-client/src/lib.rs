pub mod error;

pub use error::{BrowserlessError, Result};

use std::time::Duration;

use tracing::debug;

/// Default end-to-end timeout for a single Browserless request. `/function`
/// scripts paginate with click-and-settle loops, so this covers navigation
/// plus several settle intervals.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub struct BrowserlessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BrowserlessClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        let mut endpoint = format!("{}{}", self.base_url, path);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }
        endpoint
    }

    /// Fetch fully-rendered HTML content for a URL via the /content endpoint.
    pub async fn content(&self, url: &str) -> Result<String> {
        let body = serde_json::json!({
            "url": url,
            "gotoOptions": { "timeout": 30_000, "waitUntil": "domcontentloaded" },
        });

        debug!(url, "Browserless /content request");

        let resp = self
            .client
            .post(self.endpoint("/content"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrowserlessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }

    /// Run a puppeteer script in a fresh browser context via the /function
    /// endpoint and return the JSON value it produced. The script receives
    /// `context` as its `context` argument; the service tears the context
    /// down on every exit path, including script errors and timeouts.
    pub async fn function(
        &self,
        code: &str,
        context: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let body = serde_json::json!({
            "code": code,
            "context": context,
        });

        debug!("Browserless /function request");

        let resp = self
            .client
            .post(self.endpoint("/function"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrowserlessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            BrowserlessError::Decode(format!("function result was not JSON: {e}"))
        })
    }
}
