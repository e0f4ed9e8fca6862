use thiserror::Error;

#[derive(Error, Debug)]
pub enum YeouidoError {
    #[error("Scraping error: {0}")]
    Scrape(String),

    #[error("Content fetch error: {0}")]
    Fetch(String),

    #[error("Sentiment error: {0}")]
    Sentiment(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Roster error: {0}")]
    Roster(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
