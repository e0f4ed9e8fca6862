pub mod client;
pub mod migrate;
pub mod payload;
pub mod reader;
#[cfg(feature = "test-utils")]
pub mod testutil;
pub mod writer;

pub use client::GraphClient;
pub use neo4rs::query;
pub use payload::{GraphNode, GraphPayload, GraphRelationship};
pub use reader::GraphReader;
pub use writer::GraphWriter;
