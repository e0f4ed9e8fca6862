use std::env;

/// Application configuration loaded from environment variables.
/// Every variable has a local-development default; production deployments
/// set all of them.
#[derive(Debug, Clone)]
pub struct Config {
    // Neo4j
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,

    // Postgres
    pub postgres_host: String,
    pub postgres_port: u16,
    pub postgres_user: String,
    pub postgres_password: String,
    pub postgres_db: String,

    // Browserless (headless Chrome service)
    pub browserless_url: String,
    pub browserless_token: Option<String>,

    // Sentiment model services
    pub translator_url: String,
    pub sentiment_url: String,
    pub sentiment_token: Option<String>,

    // Read API
    pub api_host: String,
    pub api_port: u16,

    // Roster file
    pub roster_file: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            neo4j_uri: env_or("NEO4J_URI", "bolt://localhost:7687"),
            neo4j_user: env_or("NEO4J_USER", "neo4j"),
            neo4j_password: env_or("NEO4J_PASSWORD", "password"),
            postgres_host: env_or("POSTGRES_HOST", "localhost"),
            postgres_port: env_or("POSTGRES_PORT", "5432")
                .parse()
                .expect("POSTGRES_PORT must be a number"),
            postgres_user: env_or("POSTGRES_USER", "postgres"),
            postgres_password: env_or("POSTGRES_PASSWORD", "1234"),
            postgres_db: env_or("POSTGRES_DB", "postgres"),
            browserless_url: env_or("BROWSERLESS_URL", "http://localhost:3000"),
            browserless_token: env::var("BROWSERLESS_TOKEN").ok(),
            translator_url: env_or("TRANSLATOR_URL", "http://localhost:5000"),
            sentiment_url: env_or(
                "SENTIMENT_URL",
                "https://api-inference.huggingface.co/models/nlptown/bert-base-multilingual-uncased-sentiment",
            ),
            sentiment_token: env::var("SENTIMENT_TOKEN").ok(),
            api_host: env_or("API_HOST", "0.0.0.0"),
            api_port: env_or("API_PORT", "8000")
                .parse()
                .expect("API_PORT must be a number"),
            roster_file: env_or("ROSTER_FILE", "assembly_members_complete.json"),
        }
    }

    /// Connection string for the relational store.
    pub fn postgres_dsn(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.postgres_user,
            self.postgres_password,
            self.postgres_host,
            self.postgres_port,
            self.postgres_db
        )
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
