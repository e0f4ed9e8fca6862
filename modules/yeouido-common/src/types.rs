use serde::{Deserialize, Serialize};

/// Bodies are truncated to this many characters before translation and
/// classification. The classifier's input window is far smaller than a full
/// article; the lede carries the tone.
pub const BODY_TRUNCATE_CHARS: usize = 512;

/// An article as listed on a section page, before its body is fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleStub {
    pub title: String,
    pub url: String,
    pub press: String,
    pub date: String,
    pub section: String,
}

/// A fully processed article: stub plus body, mentions, and sentiment.
/// One of these becomes one `news_sentiment` row; those with two or more
/// mentions also reach the graph sink.
#[derive(Debug, Clone)]
pub struct ProcessedArticle {
    pub title: String,
    pub url: String,
    pub press: String,
    pub date: String,
    pub section: String,
    pub content: String,
    /// Roster names found in the body, in roster order, deduplicated.
    pub politicians: Vec<String>,
    /// One of "1 star" .. "5 stars", or "" when scoring was skipped/failed.
    pub sentiment_label: String,
    pub sentiment_score: f64,
    /// YYYYMMDD stamp of the run.
    pub base_date: String,
}

impl ProcessedArticle {
    /// Unordered pairs of mentioned legislators, endpoints in canonical
    /// (lexicographic) order. Empty for fewer than two mentions.
    pub fn mention_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for i in 0..self.politicians.len() {
            for j in (i + 1)..self.politicians.len() {
                let a = &self.politicians[i];
                let b = &self.politicians[j];
                if a <= b {
                    pairs.push((a.clone(), b.clone()));
                } else {
                    pairs.push((b.clone(), a.clone()));
                }
            }
        }
        pairs
    }

    pub fn polarity(&self) -> Polarity {
        Polarity::from_label(&self.sentiment_label)
    }
}

/// Ternary banding of the 5-class star scale: top two bands are positive,
/// bottom two negative, the middle band (and a missing label) neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

impl Polarity {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "4 stars" | "5 stars" => Polarity::Positive,
            "1 star" | "2 stars" => Polarity::Negative,
            _ => Polarity::Neutral,
        }
    }

    /// Graph relationship type for this polarity; neutral articles write no
    /// polarity edge.
    pub fn relation_type(&self) -> Option<&'static str> {
        match self {
            Polarity::Positive => Some("POSITIVE_SENTIMENT"),
            Polarity::Negative => Some("NEGATIVE_SENTIMENT"),
            Polarity::Neutral => None,
        }
    }
}
