use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use yeouido_common::{load_roster, Config};
use yeouido_graph::{migrate, GraphClient, GraphWriter};

#[derive(Parser, Debug)]
#[command(about = "Materialize the legislator roster as graph nodes")]
struct Args {
    /// Roster file path; defaults to the ROSTER_FILE environment variable.
    #[arg(long)]
    file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("yeouido=info".parse()?))
        .init();

    info!("Roster loader starting...");

    let args = Args::parse();
    let config = Config::from_env();

    let path = args.file.unwrap_or_else(|| config.roster_file.clone());
    let members = load_roster(&path)?;

    let client =
        GraphClient::connect(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password)
            .await
            .context("Failed to connect to Neo4j")?;

    migrate::migrate(&client)
        .await
        .context("Schema migration failed")?;

    let writer = GraphWriter::new(client);
    let written = writer.import_roster(&members).await;

    info!(
        written,
        total = members.len(),
        "Roster import complete"
    );
    Ok(())
}
