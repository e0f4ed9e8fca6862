use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use yeouido_common::{load_roster, roster_names, Config};
use yeouido_graph::{GraphClient, GraphWriter};
use yeouido_pipeline::fetcher::ReadabilityFetcher;
use yeouido_pipeline::scraper::{BrowserlessSectionScraper, ScrapeOptions};
use yeouido_pipeline::sentiment::{HttpTranslator, SentimentAnalyzer, StarSentimentClassifier};
use yeouido_pipeline::sink::save_to_graph;
use yeouido_pipeline::store::NewsSentimentStore;
use yeouido_pipeline::{NewsPipeline, PipelineOptions};

#[derive(Parser, Debug)]
#[command(about = "News-sentiment ingestion pipeline")]
struct Args {
    /// Section ids to scrape, comma-separated.
    #[arg(long, value_delimiter = ',', default_value = "100,101,102")]
    sections: Vec<String>,

    /// Article cap per section.
    #[arg(long, default_value_t = 100)]
    max_articles: usize,

    /// Load-more click cap per section.
    #[arg(long, default_value_t = 10)]
    max_clicks: u32,

    /// Roster file path; defaults to the ROSTER_FILE environment variable.
    #[arg(long)]
    roster: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("yeouido=info".parse()?))
        .init();

    info!("News pipeline starting...");

    let args = Args::parse();
    let config = Config::from_env();

    // Roster: the canonical name list for mention detection.
    let roster_path = args.roster.unwrap_or_else(|| config.roster_file.clone());
    let roster = load_roster(&roster_path)?;
    let names = roster_names(&roster);
    info!(names = names.len(), "Roster names loaded");

    // Cooperative cancellation, observed at stage boundaries.
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("SIGINT received, finishing the current stage");
                shutdown.store(true, Ordering::Relaxed);
            }
        });
    }

    let scraper = BrowserlessSectionScraper::new(
        &config.browserless_url,
        config.browserless_token.as_deref(),
    );
    let fetcher = ReadabilityFetcher::new(
        &config.browserless_url,
        config.browserless_token.as_deref(),
    );
    let scorer = SentimentAnalyzer::new(
        Box::new(HttpTranslator::new(&config.translator_url)),
        Box::new(StarSentimentClassifier::new(
            &config.sentiment_url,
            config.sentiment_token.as_deref(),
        )),
    );

    let pipeline = NewsPipeline::new(
        Box::new(scraper),
        Box::new(fetcher),
        Box::new(scorer),
        names,
        shutdown.clone(),
    );

    let opts = PipelineOptions {
        sections: args.sections,
        scrape: ScrapeOptions {
            max_articles: args.max_articles,
            max_clicks: args.max_clicks,
            ..ScrapeOptions::default()
        },
    };

    let stubs = pipeline.collect_stubs(&opts).await;
    let articles = pipeline.process(stubs).await;

    if shutdown.load(Ordering::Relaxed) {
        warn!("Cancelled before the sink stage; nothing was committed");
        return Ok(());
    }

    // Relational sink: failure here is fatal for the run.
    let store = NewsSentimentStore::connect(&config.postgres_dsn())
        .await
        .context("Failed to connect to Postgres")?;
    store
        .save(&articles)
        .await
        .context("Relational sink failed")?;

    // Graph sink: a connection failure skips the graph side only.
    match GraphClient::connect(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password)
        .await
    {
        Ok(client) => {
            let writer = GraphWriter::new(client);
            save_to_graph(&writer, &articles).await;
        }
        Err(e) => {
            error!(error = %e, "Graph connection failed, skipping graph sink");
        }
    }

    info!("News pipeline complete");
    Ok(())
}
