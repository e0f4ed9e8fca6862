use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use yeouido_common::BODY_TRUNCATE_CHARS;

// --- Collaborator traits ---

#[async_trait]
pub trait Translator: Send + Sync {
    /// Korean → English pivot translation.
    async fn translate(&self, text: &str) -> Result<String>;
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// 5-class star rating: one of "1 star" .. "5 stars" with a confidence.
    async fn classify(&self, text: &str) -> Result<(String, f64)>;
}

/// Scorer seam used by the orchestrator; implemented by `SentimentAnalyzer`
/// and mocked in tests.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    async fn score(&self, body: &str) -> Result<(String, f64)>;
}

// --- Translate-then-classify analyzer ---

pub struct SentimentAnalyzer {
    translator: Box<dyn Translator>,
    classifier: Box<dyn SentimentClassifier>,
}

impl SentimentAnalyzer {
    pub fn new(translator: Box<dyn Translator>, classifier: Box<dyn SentimentClassifier>) -> Self {
        Self {
            translator,
            classifier,
        }
    }
}

#[async_trait]
impl SentimentScorer for SentimentAnalyzer {
    async fn score(&self, body: &str) -> Result<(String, f64)> {
        let truncated = truncate_chars(body, BODY_TRUNCATE_CHARS);
        let english = self.translator.translate(&truncated).await?;
        let (label, score) = self.classifier.classify(&english).await?;
        info!(label = label.as_str(), score, "Sentiment scored");
        Ok((label, score))
    }
}

/// Character-boundary-safe truncation; byte slicing would split Hangul.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

// --- LibreTranslate-shaped HTTP translator ---

pub struct HttpTranslator {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl HttpTranslator {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        let body = serde_json::json!({
            "q": text,
            "source": "ko",
            "target": "en",
            "format": "text",
        });

        let resp = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&body)
            .send()
            .await
            .context("Translator request failed")?
            .error_for_status()
            .context("Translator returned an error status")?;

        let data: TranslateResponse = resp
            .json()
            .await
            .context("Failed to parse translator response")?;

        Ok(data.translated_text)
    }
}

// --- Hugging Face inference classifier ---

/// Classifier backed by a Hugging Face inference endpoint serving the
/// multilingual 5-star sentiment model.
pub struct StarSentimentClassifier {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl StarSentimentClassifier {
    pub fn new(url: &str, token: Option<&str>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            url: url.to_string(),
            token: token.map(String::from),
        }
    }
}

#[async_trait]
impl SentimentClassifier for StarSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<(String, f64)> {
        let mut req = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "inputs": text }));
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .context("Classifier request failed")?
            .error_for_status()
            .context("Classifier returned an error status")?;

        let value: serde_json::Value = resp
            .json()
            .await
            .context("Failed to parse classifier response")?;

        best_label(&value).context("Classifier response carried no labels")
    }
}

/// Pick the top-scoring `{label, score}` entry. The inference API returns a
/// list of label scores nested one level per input.
pub(crate) fn best_label(value: &serde_json::Value) -> Option<(String, f64)> {
    let entries = match value {
        serde_json::Value::Array(outer) => match outer.first() {
            Some(serde_json::Value::Array(inner)) => inner.as_slice(),
            _ => outer.as_slice(),
        },
        _ => return None,
    };

    entries
        .iter()
        .filter_map(|entry| {
            let label = entry.get("label")?.as_str()?.to_string();
            let score = entry.get("score")?.as_f64()?;
            Some((label, score))
        })
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}
