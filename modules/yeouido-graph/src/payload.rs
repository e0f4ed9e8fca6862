use serde::Serialize;

/// Neighborhood subgraph as served by the read API.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphPayload {
    pub nodes: Vec<GraphNode>,
    pub relationships: Vec<GraphRelationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GraphPayload {
    /// Empty payload with an explanatory message (no legislator matched).
    pub fn empty_with_message(message: impl Into<String>) -> Self {
        Self {
            nodes: Vec::new(),
            relationships: Vec::new(),
            message: Some(message.into()),
        }
    }
}

/// A node keyed by its natural id: legislator name or article URL.
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub labels: Vec<String>,
    pub properties: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphRelationship {
    pub start: String,
    pub end: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub properties: serde_json::Value,
}
