// Postgres persistence for the flat news_sentiment table.

use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use yeouido_common::ProcessedArticle;

/// Rows inserted within this window before a run are deleted first, so
/// back-to-back reruns coalesce instead of accumulating near-duplicates.
/// Runs more than a window apart keep both row sets, differentiated by
/// base_date.
const REPLAY_WINDOW_HOURS: i64 = 1;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS news_sentiment (
    id BIGSERIAL PRIMARY KEY,
    title TEXT,
    url TEXT,
    press TEXT,
    date TEXT,
    politicians TEXT,
    sentiment_label TEXT,
    sentiment_score DOUBLE PRECISION,
    content TEXT,
    base_date TEXT,
    inserted_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
)
"#;

const CREATE_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_news_sentiment_base_date ON news_sentiment (base_date)";

pub struct NewsSentimentStore {
    pool: PgPool,
}

impl NewsSentimentStore {
    pub async fn connect(dsn: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(std::time::Duration::from_secs(10))
            .connect(dsn)
            .await?;
        Ok(Self { pool })
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Write one row per processed article within a single transaction:
    /// ensure schema, apply the replay guard, insert, commit. Any error
    /// rolls the whole batch back.
    pub async fn save(&self, articles: &[ProcessedArticle]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(CREATE_TABLE_SQL).execute(&mut *tx).await?;
        sqlx::query(CREATE_INDEX_SQL).execute(&mut *tx).await?;

        let cutoff = Utc::now() - Duration::hours(REPLAY_WINDOW_HOURS);
        let deleted = sqlx::query("DELETE FROM news_sentiment WHERE inserted_at >= $1")
            .bind(cutoff)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted > 0 {
            info!(deleted, "Replay guard removed rows from the last hour");
        }

        for art in articles {
            sqlx::query(
                r#"
                INSERT INTO news_sentiment
                    (title, url, press, date, politicians,
                     sentiment_label, sentiment_score, content, base_date)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(&art.title)
            .bind(&art.url)
            .bind(&art.press)
            .bind(&art.date)
            .bind(art.politicians.join(","))
            .bind(&art.sentiment_label)
            .bind(art.sentiment_score)
            .bind(&art.content)
            .bind(&art.base_date)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(rows = articles.len(), "Relational sink committed");
        Ok(())
    }
}
