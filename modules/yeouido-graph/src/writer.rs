use neo4rs::query;
use tracing::{info, warn};

use yeouido_common::{LegislatorRecord, Polarity, ProcessedArticle};

use crate::GraphClient;

/// Write-side wrapper for the graph. Used by the roster loader and the news
/// pipeline's graph sink.
pub struct GraphWriter {
    client: GraphClient,
}

impl GraphWriter {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Create-or-update an article node keyed by URL. Re-running over the
    /// same article rewrites the same properties onto the same node.
    pub async fn upsert_article(&self, art: &ProcessedArticle) -> Result<(), neo4rs::Error> {
        let q = query(
            "MERGE (a:Article {url: $url})
             SET a.title = $title,
                 a.press = $press,
                 a.date = $date,
                 a.sentiment_label = $sentiment_label,
                 a.sentiment_score = $sentiment_score,
                 a.base_date = $base_date",
        )
        .param("url", art.url.as_str())
        .param("title", art.title.as_str())
        .param("press", art.press.as_str())
        .param("date", art.date.as_str())
        .param("sentiment_label", art.sentiment_label.as_str())
        .param("sentiment_score", art.sentiment_score)
        .param("base_date", art.base_date.as_str());

        self.client.graph.run(q).await
    }

    /// Bare legislator node keyed by name. The roster loader is the
    /// authoritative creator; the pipeline also upserts so a mention edge
    /// never dangles when the roster import lagged behind.
    pub async fn upsert_legislator(&self, name: &str) -> Result<(), neo4rs::Error> {
        let q = query("MERGE (p:Legislator {name: $name})").param("name", name);
        self.client.graph.run(q).await
    }

    /// Article → legislator mention edge. Binds the article first, then
    /// matches the legislator, so the engine never cross-joins the two sets.
    pub async fn link_mention(
        &self,
        article_url: &str,
        name: &str,
    ) -> Result<(), neo4rs::Error> {
        let q = query(
            "MATCH (a:Article {url: $url})
             WITH a
             MATCH (p:Legislator {name: $name})
             MERGE (a)-[:PUBLISHED_ABOUT]->(p)",
        )
        .param("url", article_url)
        .param("name", name);

        self.client.graph.run(q).await
    }

    /// Co-mention edge between two legislators, one edge per unordered pair
    /// with endpoints in lexicographic order.
    pub async fn link_co_mention(&self, name1: &str, name2: &str) -> Result<(), neo4rs::Error> {
        let (first, second) = canonical_pair(name1, name2);
        let q = query(
            "MATCH (p1:Legislator {name: $name1})
             WITH p1
             MATCH (p2:Legislator {name: $name2})
             MERGE (p1)-[:MENTIONED_TOGETHER]->(p2)",
        )
        .param("name1", first)
        .param("name2", second);

        self.client.graph.run(q).await
    }

    /// Polarity edge per (pair, polarity): created with count = 1, then
    /// incremented on each qualifying article, recording the most recent
    /// contributing article URL. Neutral polarity writes nothing.
    pub async fn increment_polarity(
        &self,
        name1: &str,
        name2: &str,
        polarity: Polarity,
        article_url: &str,
    ) -> Result<(), neo4rs::Error> {
        let Some(rel_type) = polarity.relation_type() else {
            return Ok(());
        };

        let (first, second) = canonical_pair(name1, name2);
        let q = query(&format!(
            "MATCH (p1:Legislator {{name: $name1}})
             WITH p1
             MATCH (p2:Legislator {{name: $name2}})
             MERGE (p1)-[r:{rel_type}]->(p2)
             SET r.count = coalesce(r.count, 0) + 1,
                 r.via_article = $url"
        ))
        .param("name1", first)
        .param("name2", second)
        .param("url", article_url);

        self.client.graph.run(q).await
    }

    /// Full legislator record from the roster file. MERGE on name; the news
    /// pipeline never writes these attributes.
    pub async fn upsert_member(&self, m: &LegislatorRecord) -> Result<(), neo4rs::Error> {
        let q = query(
            "MERGE (p:Legislator {name: $name})
             SET p.party = $party,
                 p.region = $region,
                 p.gender = $gender,
                 p.committees = $committees,
                 p.unit = $unit,
                 p.election_count = $election_count,
                 p.election_method = $election_method,
                 p.photo_url = $photo_url,
                 p.photo_filename = $photo_filename",
        )
        .param("name", m.name.as_str())
        .param("party", m.party.as_str())
        .param("region", m.region.as_str())
        .param("gender", m.gender.as_str())
        .param("committees", m.committees.as_str())
        .param("unit", m.unit.as_str())
        .param("election_count", m.election_count.as_str())
        .param("election_method", m.election_method.as_str())
        .param("photo_url", m.photo_url.as_str())
        .param("photo_filename", m.photo_filename.as_str());

        self.client.graph.run(q).await
    }

    /// Materialize every roster record as a Legislator node. Returns the
    /// number of nodes written; per-record failures are logged and skipped.
    pub async fn import_roster(&self, members: &[LegislatorRecord]) -> u64 {
        let mut written = 0u64;
        for (i, m) in members.iter().enumerate() {
            match self.upsert_member(m).await {
                Ok(()) => {
                    written += 1;
                    info!(
                        name = m.name.as_str(),
                        current = i + 1,
                        total = members.len(),
                        "Legislator node upserted"
                    );
                }
                Err(e) => {
                    warn!(name = m.name.as_str(), error = %e, "Failed to upsert legislator");
                }
            }
        }
        written
    }
}

fn canonical_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
