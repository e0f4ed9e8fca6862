use neo4rs::query;
use tracing::{info, warn};

use crate::GraphClient;

/// Run idempotent schema migrations: uniqueness constraints on the natural
/// keys and the base-date index used by date-partitioned reads.
pub async fn migrate(client: &GraphClient) -> Result<(), neo4rs::Error> {
    let g = &client.graph;

    info!("Running schema migrations...");

    let statements = [
        "CREATE CONSTRAINT legislator_name_unique IF NOT EXISTS \
         FOR (m:Legislator) REQUIRE m.name IS UNIQUE",
        "CREATE CONSTRAINT article_url_unique IF NOT EXISTS \
         FOR (a:Article) REQUIRE a.url IS UNIQUE",
        "CREATE INDEX article_base_date IF NOT EXISTS \
         FOR (a:Article) ON (a.base_date)",
    ];

    for s in &statements {
        run_ignoring_exists(g, s).await?;
    }

    info!("Schema migrations complete");
    Ok(())
}

/// Servers that predate `IF NOT EXISTS` report an "already exists" error
/// instead; treat that as success.
async fn run_ignoring_exists(g: &neo4rs::Graph, cypher: &str) -> Result<(), neo4rs::Error> {
    match g.run(query(cypher)).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let msg = e.to_string();
            if msg.contains("already exists") || msg.contains("EquivalentSchemaRule") {
                warn!(cypher, "Schema object already exists, skipping");
                Ok(())
            } else {
                Err(e)
            }
        }
    }
}
