use async_trait::async_trait;
use spider_transformations::transformation::content::{
    transform_content_input, ReturnFormat, TransformConfig, TransformInput,
};
use tracing::{info, warn};

use browserless_client::BrowserlessClient;

// --- ContentFetcher trait ---

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Plain-text article body, or the empty string on any failure. Failures
    /// never propagate; downstream treats an empty body as "no mentions
    /// possible". One attempt per URL per run.
    async fn fetch(&self, url: &str) -> String;
}

// --- Browserless + Readability fetcher ---

pub struct ReadabilityFetcher {
    client: BrowserlessClient,
}

impl ReadabilityFetcher {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self {
            client: BrowserlessClient::new(base_url, token),
        }
    }
}

#[async_trait]
impl ContentFetcher for ReadabilityFetcher {
    async fn fetch(&self, url: &str) -> String {
        let html = match self.client.content(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url, error = %e, "Article fetch failed");
                return String::new();
            }
        };

        if html.is_empty() {
            warn!(url, "Empty HTML response");
            return String::new();
        }

        let parsed_url = url::Url::parse(url).ok();
        let config = TransformConfig {
            readability: true,
            main_content: true,
            return_format: ReturnFormat::Markdown,
            filter_images: true,
            filter_svg: true,
            clean_html: true,
        };
        let input = TransformInput {
            url: parsed_url.as_ref(),
            content: html.as_bytes(),
            screenshot_bytes: None,
            encoding: None,
            selector_config: None,
            ignore_tags: None,
        };

        let text = transform_content_input(input, &config);

        if text.trim().is_empty() {
            warn!(url, "Empty content after Readability extraction");
            return String::new();
        }

        info!(url, bytes = text.len(), "Article body extracted");
        text
    }
}
