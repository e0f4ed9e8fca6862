mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use yeouido_common::Config;
use yeouido_graph::{GraphClient, GraphReader};

use routes::{api_graph_all, api_graph_by_name, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("yeouido=info".parse()?))
        .init();

    info!("Read API starting...");

    let config = Config::from_env();

    let client =
        GraphClient::connect(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password)
            .await
            .context("Failed to connect to Neo4j")?;
    let state = Arc::new(AppState {
        reader: GraphReader::new(client),
    });

    // The static /all route must not be captured by the {name} matcher;
    // axum prefers the literal segment.
    let app = Router::new()
        .route("/api/graph/all", get(api_graph_all))
        .route("/api/graph/{name}", get(api_graph_by_name))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.api_host, config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = addr.as_str(), "Read API listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
