//! Orchestrator scenario tests: mock stage implementations drive the
//! pipeline end-to-end and a recording sink captures the exact graph
//! mutation sequence.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use yeouido_common::{ArticleStub, Polarity, ProcessedArticle};
use yeouido_pipeline::fetcher::ContentFetcher;
use yeouido_pipeline::scraper::{ScrapeOptions, SectionScraper};
use yeouido_pipeline::sentiment::SentimentScorer;
use yeouido_pipeline::sink::{save_to_graph, ArticleSink};
use yeouido_pipeline::{NewsPipeline, PipelineOptions};

// ---------------------------------------------------------------------------
// Mock stages
// ---------------------------------------------------------------------------

struct MockScraper {
    stubs: Vec<ArticleStub>,
}

#[async_trait]
impl SectionScraper for MockScraper {
    async fn collect(
        &self,
        section_id: &str,
        _opts: &ScrapeOptions,
        seen: &HashSet<String>,
    ) -> Result<Vec<ArticleStub>> {
        Ok(self
            .stubs
            .iter()
            .filter(|s| s.section == section_id && !seen.contains(&s.url))
            .cloned()
            .collect())
    }
}

struct MockFetcher {
    bodies: HashMap<String, String>,
}

#[async_trait]
impl ContentFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> String {
        self.bodies.get(url).cloned().unwrap_or_default()
    }
}

struct MockScorer {
    label: String,
    score: f64,
    /// Bodies containing this marker make the scorer fail.
    fail_marker: Option<String>,
}

#[async_trait]
impl SentimentScorer for MockScorer {
    async fn score(&self, body: &str) -> Result<(String, f64)> {
        if let Some(ref marker) = self.fail_marker {
            if body.contains(marker.as_str()) {
                return Err(anyhow!("classifier unavailable"));
            }
        }
        Ok((self.label.clone(), self.score))
    }
}

// ---------------------------------------------------------------------------
// Recording sink
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Article(String),
    Legislator(String),
    Mention(String, String),
    CoMention(String, String),
    Polarity(String, String, &'static str, String),
}

#[derive(Default)]
struct RecordingSink {
    ops: Mutex<Vec<Op>>,
}

impl RecordingSink {
    fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    fn push(&self, op: Op) {
        self.ops.lock().unwrap().push(op);
    }
}

#[async_trait]
impl ArticleSink for RecordingSink {
    async fn upsert_article(&self, art: &ProcessedArticle) -> Result<()> {
        self.push(Op::Article(art.url.clone()));
        Ok(())
    }

    async fn upsert_legislator(&self, name: &str) -> Result<()> {
        self.push(Op::Legislator(name.to_string()));
        Ok(())
    }

    async fn link_mention(&self, article_url: &str, name: &str) -> Result<()> {
        self.push(Op::Mention(article_url.to_string(), name.to_string()));
        Ok(())
    }

    async fn link_co_mention(&self, name1: &str, name2: &str) -> Result<()> {
        self.push(Op::CoMention(name1.to_string(), name2.to_string()));
        Ok(())
    }

    async fn increment_polarity(
        &self,
        name1: &str,
        name2: &str,
        polarity: Polarity,
        article_url: &str,
    ) -> Result<()> {
        self.push(Op::Polarity(
            name1.to_string(),
            name2.to_string(),
            polarity.relation_type().expect("neutral never reaches the sink"),
            article_url.to_string(),
        ));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const URL_1: &str = "https://n.news.example.com/article/0001";
const URL_2: &str = "https://n.news.example.com/article/0002";

fn stub(url: &str, section: &str) -> ArticleStub {
    ArticleStub {
        title: format!("headline for {url}"),
        url: url.to_string(),
        press: "테스트일보".to_string(),
        date: "2026-08-07 09:00".to_string(),
        section: section.to_string(),
    }
}

fn roster() -> Vec<String> {
    vec!["A".to_string(), "B".to_string(), "C".to_string()]
}

fn pipeline_with(
    stubs: Vec<ArticleStub>,
    bodies: &[(&str, &str)],
    scorer: MockScorer,
) -> NewsPipeline {
    NewsPipeline::new(
        Box::new(MockScraper { stubs }),
        Box::new(MockFetcher {
            bodies: bodies
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }),
        Box::new(scorer),
        roster(),
        Arc::new(AtomicBool::new(false)),
    )
}

fn options(sections: &[&str]) -> PipelineOptions {
    PipelineOptions {
        sections: sections.iter().map(|s| s.to_string()).collect(),
        scrape: ScrapeOptions::default(),
    }
}

async fn run(pipeline: &NewsPipeline, opts: &PipelineOptions) -> Vec<ProcessedArticle> {
    let stubs = pipeline.collect_stubs(opts).await;
    pipeline.process(stubs).await
}

// ===========================================================================
// Scenario: negative article writes mention, co-mention, and polarity edges
// ===========================================================================

#[tokio::test]
async fn negative_article_writes_full_edge_set() {
    let pipeline = pipeline_with(
        vec![stub(URL_1, "100")],
        &[(URL_1, "A said B was wrong.")],
        MockScorer {
            label: "2 stars".into(),
            score: 0.7,
            fail_marker: None,
        },
    );

    let articles = run(&pipeline, &options(&["100"])).await;
    assert_eq!(articles.len(), 1);
    let art = &articles[0];
    assert_eq!(art.politicians, vec!["A", "B"]);
    assert_eq!(art.sentiment_label, "2 stars");
    assert_eq!(art.sentiment_score, 0.7);
    assert_eq!(art.polarity(), Polarity::Negative);

    let sink = RecordingSink::default();
    assert_eq!(save_to_graph(&sink, &articles).await, 1);

    let expected = vec![
        Op::Article(URL_1.into()),
        Op::Legislator("A".into()),
        Op::Mention(URL_1.into(), "A".into()),
        Op::Legislator("B".into()),
        Op::Mention(URL_1.into(), "B".into()),
        Op::CoMention("A".into(), "B".into()),
        Op::Polarity("A".into(), "B".into(), "NEGATIVE_SENTIMENT", URL_1.into()),
    ];
    assert_eq!(sink.ops(), expected, "exact mutation order, no edge to C");
}

// ===========================================================================
// Scenario: re-running the same article re-increments polarity only
// ===========================================================================

#[tokio::test]
async fn rerun_repeats_polarity_increment_with_same_via_article() {
    let pipeline = pipeline_with(
        vec![stub(URL_1, "100")],
        &[(URL_1, "A said B was wrong.")],
        MockScorer {
            label: "2 stars".into(),
            score: 0.7,
            fail_marker: None,
        },
    );
    let articles = run(&pipeline, &options(&["100"])).await;

    let sink = RecordingSink::default();
    save_to_graph(&sink, &articles).await;
    save_to_graph(&sink, &articles).await;

    let polarity_ops: Vec<Op> = sink
        .ops()
        .into_iter()
        .filter(|op| matches!(op, Op::Polarity(..)))
        .collect();
    assert_eq!(polarity_ops.len(), 2, "count accumulates per re-ingest");
    assert_eq!(polarity_ops[0], polarity_ops[1], "same pair, same via_article");
}

// ===========================================================================
// Scenario: a single mention yields an empty row and no graph writes
// ===========================================================================

#[tokio::test]
async fn single_mention_writes_nothing_to_graph() {
    let pipeline = pipeline_with(
        vec![stub(URL_1, "100")],
        &[(URL_1, "Only A appears in this body.")],
        MockScorer {
            label: "5 stars".into(),
            score: 0.99,
            fail_marker: None,
        },
    );

    let articles = run(&pipeline, &options(&["100"])).await;
    assert_eq!(articles.len(), 1, "the relational row is still produced");
    assert!(articles[0].politicians.is_empty());
    assert_eq!(articles[0].sentiment_label, "");
    assert_eq!(articles[0].sentiment_score, 0.0);

    let sink = RecordingSink::default();
    assert_eq!(save_to_graph(&sink, &articles).await, 0);
    assert!(sink.ops().is_empty(), "no edges for a sub-threshold article");
}

// ===========================================================================
// Scenario: neutral label yields co-mentions but zero polarity edges
// ===========================================================================

#[tokio::test]
async fn neutral_label_writes_no_polarity_edges() {
    let pipeline = pipeline_with(
        vec![stub(URL_1, "100")],
        &[(URL_1, "A met B and C at the assembly.")],
        MockScorer {
            label: "3 stars".into(),
            score: 0.5,
            fail_marker: None,
        },
    );

    let articles = run(&pipeline, &options(&["100"])).await;
    assert_eq!(articles[0].politicians, vec!["A", "B", "C"]);

    let sink = RecordingSink::default();
    save_to_graph(&sink, &articles).await;
    let ops = sink.ops();

    let mentions = ops.iter().filter(|op| matches!(op, Op::Mention(..))).count();
    let co_mentions = ops
        .iter()
        .filter(|op| matches!(op, Op::CoMention(..)))
        .count();
    let polarities = ops.iter().filter(|op| matches!(op, Op::Polarity(..))).count();

    assert_eq!(mentions, 3);
    assert_eq!(co_mentions, 3, "pairs {{A,B}}, {{A,C}}, {{B,C}}");
    assert_eq!(polarities, 0);
}

// ===========================================================================
// Scenario: scorer failure downgrades one article, ingestion continues
// ===========================================================================

#[tokio::test]
async fn scorer_failure_skips_polarity_but_not_the_run() {
    let pipeline = pipeline_with(
        vec![stub(URL_1, "100"), stub(URL_2, "100")],
        &[
            (URL_1, "A and B argued. POISON"),
            (URL_2, "A praised B warmly."),
        ],
        MockScorer {
            label: "5 stars".into(),
            score: 0.9,
            fail_marker: Some("POISON".into()),
        },
    );

    let articles = run(&pipeline, &options(&["100"])).await;
    assert_eq!(articles.len(), 2);

    assert_eq!(articles[0].sentiment_label, "");
    assert_eq!(articles[0].sentiment_score, 0.0);
    assert_eq!(
        articles[0].politicians,
        vec!["A", "B"],
        "mentions survive a scorer failure"
    );
    assert_eq!(articles[1].sentiment_label, "5 stars");

    let sink = RecordingSink::default();
    assert_eq!(save_to_graph(&sink, &articles).await, 2);
    let ops = sink.ops();

    // Failed article still links mentions and the co-mention, no polarity.
    let failed_polarities = ops
        .iter()
        .filter(|op| matches!(op, Op::Polarity(_, _, _, url) if url == URL_1))
        .count();
    assert_eq!(failed_polarities, 0);

    let scored_polarities = ops
        .iter()
        .filter(|op| {
            matches!(op, Op::Polarity(_, _, "POSITIVE_SENTIMENT", url) if url == URL_2)
        })
        .count();
    assert_eq!(scored_polarities, 1);
}

// ===========================================================================
// Property: URL uniqueness holds globally across sections
// ===========================================================================

#[tokio::test]
async fn duplicate_urls_across_sections_collapse_to_first() {
    let pipeline = pipeline_with(
        vec![stub(URL_1, "100"), stub(URL_1, "101"), stub(URL_2, "101")],
        &[(URL_1, ""), (URL_2, "")],
        MockScorer {
            label: "3 stars".into(),
            score: 0.5,
            fail_marker: None,
        },
    );

    let stubs = pipeline.collect_stubs(&options(&["100", "101"])).await;
    assert_eq!(stubs.len(), 2);
    assert_eq!(stubs[0].section, "100", "first occurrence preserved");
}

// ===========================================================================
// Property: an unreachable URL yields an empty body without raising
// ===========================================================================

#[tokio::test]
async fn unreachable_fetch_yields_empty_string() {
    use yeouido_pipeline::fetcher::ReadabilityFetcher;

    // Nothing listens on this port; the fetch must degrade to "".
    let fetcher = ReadabilityFetcher::new("http://127.0.0.1:9", None);
    let body = fetcher.fetch("https://n.news.example.com/article/0001").await;
    assert_eq!(body, "");
}
