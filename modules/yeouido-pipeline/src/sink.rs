use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use yeouido_common::{Polarity, ProcessedArticle};
use yeouido_graph::GraphWriter;

/// The graph sink's mutation surface, one method per upsert. A seam for
/// tests; `GraphWriter` is the production implementation.
#[async_trait]
pub trait ArticleSink: Send + Sync {
    async fn upsert_article(&self, art: &ProcessedArticle) -> Result<()>;
    async fn upsert_legislator(&self, name: &str) -> Result<()>;
    async fn link_mention(&self, article_url: &str, name: &str) -> Result<()>;
    async fn link_co_mention(&self, name1: &str, name2: &str) -> Result<()>;
    async fn increment_polarity(
        &self,
        name1: &str,
        name2: &str,
        polarity: Polarity,
        article_url: &str,
    ) -> Result<()>;
}

/// Ingest one article into the graph in the fixed order: article upsert;
/// per-name legislator upsert then mention link; per-pair co-mention; then
/// the polarity increment when the label bands positive or negative.
pub async fn ingest_article(sink: &dyn ArticleSink, art: &ProcessedArticle) -> Result<()> {
    sink.upsert_article(art).await?;

    for name in &art.politicians {
        sink.upsert_legislator(name).await?;
        sink.link_mention(&art.url, name).await?;
    }

    let polarity = art.polarity();
    for (a, b) in art.mention_pairs() {
        sink.link_co_mention(&a, &b).await?;
        if polarity.relation_type().is_some() {
            sink.increment_polarity(&a, &b, polarity, &art.url).await?;
        }
    }

    Ok(())
}

/// Fan processed articles out to the graph. Articles with fewer than two
/// mentions write nothing; a failure on one article is logged and the rest
/// continue. Returns the number of articles ingested.
pub async fn save_to_graph(sink: &dyn ArticleSink, articles: &[ProcessedArticle]) -> usize {
    let eligible = articles
        .iter()
        .filter(|a| a.politicians.len() >= 2)
        .count();
    info!(
        total = articles.len(),
        eligible, "Graph sink starting"
    );

    let mut written = 0usize;
    for (i, art) in articles.iter().enumerate() {
        if art.politicians.len() < 2 {
            continue;
        }
        info!(
            current = i + 1,
            total = articles.len(),
            title = art.title.as_str(),
            "Writing article to graph"
        );
        match ingest_article(sink, art).await {
            Ok(()) => written += 1,
            Err(e) => {
                warn!(url = art.url.as_str(), error = %e, "Graph write failed for article");
            }
        }
    }

    info!(written, "Graph sink complete");
    written
}

#[async_trait]
impl ArticleSink for GraphWriter {
    async fn upsert_article(&self, art: &ProcessedArticle) -> Result<()> {
        GraphWriter::upsert_article(self, art).await?;
        Ok(())
    }

    async fn upsert_legislator(&self, name: &str) -> Result<()> {
        GraphWriter::upsert_legislator(self, name).await?;
        Ok(())
    }

    async fn link_mention(&self, article_url: &str, name: &str) -> Result<()> {
        GraphWriter::link_mention(self, article_url, name).await?;
        Ok(())
    }

    async fn link_co_mention(&self, name1: &str, name2: &str) -> Result<()> {
        GraphWriter::link_co_mention(self, name1, name2).await?;
        Ok(())
    }

    async fn increment_polarity(
        &self,
        name1: &str,
        name2: &str,
        polarity: Polarity,
        article_url: &str,
    ) -> Result<()> {
        GraphWriter::increment_polarity(self, name1, name2, polarity, article_url).await?;
        Ok(())
    }
}
