use std::collections::BTreeSet;

use neo4rs::query;
use serde_json::json;
use tracing::info;

use crate::payload::{GraphNode, GraphPayload, GraphRelationship};
use crate::GraphClient;

/// Maximum relationship rows returned for a single neighborhood request.
const NEIGHBORHOOD_REL_CAP: usize = 100;

/// Read-only wrapper for the graph. Used by the read API.
pub struct GraphReader {
    client: GraphClient,
}

impl GraphReader {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Resolve a name fragment to a legislator by substring match.
    /// Returns the first matching full name.
    pub async fn resolve_name(&self, fragment: &str) -> Result<Option<String>, neo4rs::Error> {
        let q = query(
            "MATCH (m:Legislator)
             WHERE m.name CONTAINS $name
             RETURN m.name AS name
             ORDER BY m.name
             LIMIT 1",
        )
        .param("name", fragment);

        let mut stream = self.client.graph.execute(q).await?;
        if let Some(row) = stream.next().await? {
            let name: String = row.get("name").unwrap_or_default();
            if !name.is_empty() {
                return Ok(Some(name));
            }
        }
        Ok(None)
    }

    /// Neighborhood subgraph around a legislator: every relationship on a
    /// path of length <= depth whose far end is a Legislator or Article.
    /// Depth is clamped to 1..=5 and interpolated (Cypher cannot
    /// parameterize variable-length bounds).
    pub async fn neighborhood(
        &self,
        name: &str,
        depth: u8,
    ) -> Result<GraphPayload, neo4rs::Error> {
        let depth = depth.clamp(1, 5);

        let cypher = format!(
            "MATCH (m:Legislator {{name: $name}})-[rs*1..{depth}]-(c)
             WHERE c:Legislator OR c:Article
             UNWIND rs AS r
             WITH DISTINCT r
             RETURN type(r) AS rel_type,
                    labels(startNode(r))[0] AS start_label,
                    coalesce(startNode(r).name, startNode(r).url, '') AS start_key,
                    labels(endNode(r))[0] AS end_label,
                    coalesce(endNode(r).name, endNode(r).url, '') AS end_key,
                    coalesce(r.count, 0) AS count,
                    coalesce(r.via_article, '') AS via_article
             LIMIT {NEIGHBORHOOD_REL_CAP}"
        );
        let q = query(&cypher).param("name", name);
        let relationships = self.collect_relationships(q).await?;

        info!(
            name,
            depth,
            relationships = relationships.len(),
            "Neighborhood query complete"
        );

        self.assemble(Some(name), relationships).await
    }

    /// Sample of the legislator-to-legislator network: relationships drawn
    /// from paths of length <= 2, capped at `limit` path rows.
    pub async fn sample_paths(&self, limit: u32) -> Result<GraphPayload, neo4rs::Error> {
        let q = query(
            "MATCH (p:Legislator)-[rs*1..2]-(q:Legislator)
             WITH rs LIMIT $limit
             UNWIND rs AS r
             WITH DISTINCT r
             RETURN type(r) AS rel_type,
                    labels(startNode(r))[0] AS start_label,
                    coalesce(startNode(r).name, startNode(r).url, '') AS start_key,
                    labels(endNode(r))[0] AS end_label,
                    coalesce(endNode(r).name, endNode(r).url, '') AS end_key,
                    coalesce(r.count, 0) AS count,
                    coalesce(r.via_article, '') AS via_article",
        )
        .param("limit", limit as i64);

        let relationships = self.collect_relationships(q).await?;

        info!(
            limit,
            relationships = relationships.len(),
            "Sample paths query complete"
        );

        self.assemble(None, relationships).await
    }

    async fn collect_relationships(
        &self,
        q: neo4rs::Query,
    ) -> Result<Vec<GraphRelationship>, neo4rs::Error> {
        let mut relationships = Vec::new();
        let mut stream = self.client.graph.execute(q).await?;
        while let Some(row) = stream.next().await? {
            let rel_type: String = row.get("rel_type").unwrap_or_default();
            let start_key: String = row.get("start_key").unwrap_or_default();
            let end_key: String = row.get("end_key").unwrap_or_default();
            if rel_type.is_empty() || start_key.is_empty() || end_key.is_empty() {
                continue;
            }

            let count: i64 = row.get("count").unwrap_or(0);
            let via_article: String = row.get("via_article").unwrap_or_default();
            let properties = if count > 0 {
                json!({ "count": count, "via_article": via_article })
            } else {
                json!({})
            };

            relationships.push(GraphRelationship {
                start: start_key,
                end: end_key,
                rel_type,
                properties,
            });
        }
        Ok(relationships)
    }

    /// Build the node set induced by the relationship endpoints (plus the
    /// focus legislator, who may have no edges yet) and hydrate each node's
    /// properties from the graph.
    async fn assemble(
        &self,
        focus: Option<&str>,
        relationships: Vec<GraphRelationship>,
    ) -> Result<GraphPayload, neo4rs::Error> {
        let mut names: BTreeSet<String> = BTreeSet::new();
        let mut urls: BTreeSet<String> = BTreeSet::new();

        if let Some(name) = focus {
            names.insert(name.to_string());
        }
        for rel in &relationships {
            for key in [&rel.start, &rel.end] {
                // Article keys are URLs; legislator names never parse as one.
                if key.starts_with("http://") || key.starts_with("https://") {
                    urls.insert(key.clone());
                } else {
                    names.insert(key.clone());
                }
            }
        }

        let mut nodes = Vec::new();
        nodes.extend(self.legislator_nodes(&names).await?);
        nodes.extend(self.article_nodes(&urls).await?);

        Ok(GraphPayload {
            nodes,
            relationships,
            message: None,
        })
    }

    async fn legislator_nodes(
        &self,
        names: &BTreeSet<String>,
    ) -> Result<Vec<GraphNode>, neo4rs::Error> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let q = query(
            "MATCH (p:Legislator)
             WHERE p.name IN $names
             RETURN p.name AS name,
                    coalesce(p.party, '') AS party,
                    coalesce(p.region, '') AS region,
                    coalesce(p.gender, '') AS gender,
                    coalesce(p.committees, '') AS committees,
                    coalesce(p.unit, '') AS unit,
                    coalesce(p.election_count, '') AS election_count,
                    coalesce(p.photo_filename, '') AS photo_filename",
        )
        .param("names", names.iter().cloned().collect::<Vec<String>>());

        let mut nodes = Vec::new();
        let mut stream = self.client.graph.execute(q).await?;
        while let Some(row) = stream.next().await? {
            let name: String = row.get("name").unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let properties = json!({
                "name": name.clone(),
                "party": row.get::<String>("party").unwrap_or_default(),
                "region": row.get::<String>("region").unwrap_or_default(),
                "gender": row.get::<String>("gender").unwrap_or_default(),
                "committees": row.get::<String>("committees").unwrap_or_default(),
                "unit": row.get::<String>("unit").unwrap_or_default(),
                "election_count": row.get::<String>("election_count").unwrap_or_default(),
                "photo_filename": row.get::<String>("photo_filename").unwrap_or_default(),
            });
            nodes.push(GraphNode {
                id: name,
                labels: vec!["Legislator".to_string()],
                properties,
            });
        }
        Ok(nodes)
    }

    async fn article_nodes(
        &self,
        urls: &BTreeSet<String>,
    ) -> Result<Vec<GraphNode>, neo4rs::Error> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        let q = query(
            "MATCH (a:Article)
             WHERE a.url IN $urls
             RETURN a.url AS url,
                    coalesce(a.title, '') AS title,
                    coalesce(a.press, '') AS press,
                    coalesce(a.date, '') AS date,
                    coalesce(a.sentiment_label, '') AS sentiment_label,
                    coalesce(a.sentiment_score, 0.0) AS sentiment_score,
                    coalesce(a.base_date, '') AS base_date",
        )
        .param("urls", urls.iter().cloned().collect::<Vec<String>>());

        let mut nodes = Vec::new();
        let mut stream = self.client.graph.execute(q).await?;
        while let Some(row) = stream.next().await? {
            let url: String = row.get("url").unwrap_or_default();
            if url.is_empty() {
                continue;
            }
            let properties = json!({
                "url": url.clone(),
                "title": row.get::<String>("title").unwrap_or_default(),
                "press": row.get::<String>("press").unwrap_or_default(),
                "date": row.get::<String>("date").unwrap_or_default(),
                "sentiment_label": row.get::<String>("sentiment_label").unwrap_or_default(),
                "sentiment_score": row.get::<f64>("sentiment_score").unwrap_or(0.0),
                "base_date": row.get::<String>("base_date").unwrap_or_default(),
            });
            nodes.push(GraphNode {
                id: url,
                labels: vec!["Article".to_string()],
                properties,
            });
        }
        Ok(nodes)
    }
}
