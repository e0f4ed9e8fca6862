use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use yeouido_common::{ArticleStub, ProcessedArticle};

use crate::fetcher::ContentFetcher;
use crate::scraper::{dedupe_stubs, ScrapeOptions, SectionScraper};
use crate::sentiment::SentimentScorer;
use crate::tagger::extract_mentions;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub sections: Vec<String>,
    pub scrape: ScrapeOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            sections: crate::sources::DEFAULT_SECTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            scrape: ScrapeOptions::default(),
        }
    }
}

/// The batch ingestion pipeline: scrape sections, dedupe stubs, then fetch,
/// tag, and score one article at a time. Sinks run after collection (see the
/// binary). Article-level stages execute sequentially; the graph writer's
/// pair-wise upserts stay easy to reason about without concurrent mutations
/// against the same legislator nodes.
pub struct NewsPipeline {
    scraper: Box<dyn SectionScraper>,
    fetcher: Box<dyn ContentFetcher>,
    scorer: Box<dyn SentimentScorer>,
    roster_names: Vec<String>,
    shutdown: Arc<AtomicBool>,
}

impl NewsPipeline {
    pub fn new(
        scraper: Box<dyn SectionScraper>,
        fetcher: Box<dyn ContentFetcher>,
        scorer: Box<dyn SentimentScorer>,
        roster_names: Vec<String>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            scraper,
            fetcher,
            scorer,
            roster_names,
            shutdown,
        }
    }

    fn cancelled(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Scrape every configured section, enforcing URL uniqueness globally
    /// across sections. A section-level failure aborts only that section.
    pub async fn collect_stubs(&self, opts: &PipelineOptions) -> Vec<ArticleStub> {
        info!(sections = opts.sections.len(), "Scrape stage starting");

        let mut seen: HashSet<String> = HashSet::new();
        let mut all_stubs = Vec::new();

        for section in &opts.sections {
            if self.cancelled() {
                warn!("Cancellation observed, stopping section scrape");
                break;
            }
            match self.scraper.collect(section, &opts.scrape, &seen).await {
                Ok(stubs) => {
                    for stub in stubs {
                        if seen.insert(stub.url.clone()) {
                            all_stubs.push(stub);
                        }
                    }
                    info!(
                        section = section.as_str(),
                        collected = all_stubs.len(),
                        "Section done"
                    );
                }
                Err(e) => {
                    warn!(section = section.as_str(), error = %e, "Section aborted");
                }
            }
        }

        let stubs = dedupe_stubs(all_stubs);
        info!(articles = stubs.len(), "Scrape stage complete");
        stubs
    }

    /// Fetch, tag, and score each stub. Per-article failures downgrade to an
    /// empty body or an empty sentiment label and the loop continues.
    pub async fn process(&self, stubs: Vec<ArticleStub>) -> Vec<ProcessedArticle> {
        let base_date = Local::now().format("%Y%m%d").to_string();
        let total = stubs.len();
        info!(total, base_date = base_date.as_str(), "Article stage starting");

        let mut results = Vec::with_capacity(total);

        for (i, stub) in stubs.into_iter().enumerate() {
            if self.cancelled() {
                warn!("Cancellation observed, stopping article processing");
                break;
            }

            info!(
                current = i + 1,
                total,
                title = stub.title.as_str(),
                url = stub.url.as_str(),
                "Processing article"
            );

            let content = self.fetcher.fetch(&stub.url).await;
            info!(bytes = content.len(), "Body extracted");

            let found = extract_mentions(&content, &self.roster_names);
            info!(mentions = ?found, "Roster mentions");

            let (politicians, sentiment_label, sentiment_score) =
                if found.len() >= 2 && !content.is_empty() {
                    match self.scorer.score(&content).await {
                        Ok((label, score)) => (found, label, score),
                        Err(e) => {
                            warn!(url = stub.url.as_str(), error = %e, "Sentiment scoring failed");
                            (found, String::new(), 0.0)
                        }
                    }
                } else {
                    info!("Skipping sentiment: fewer than two mentions or empty body");
                    (Vec::new(), String::new(), 0.0)
                };

            results.push(ProcessedArticle {
                title: stub.title,
                url: stub.url,
                press: stub.press,
                date: stub.date,
                section: stub.section,
                content,
                politicians,
                sentiment_label,
                sentiment_score,
                base_date: base_date.clone(),
            });
        }

        info!(processed = results.len(), "Article stage complete");
        results
    }
}
