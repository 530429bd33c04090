//! Loads event documents from a JSON file into the event store.
//!
//! Usage: `seed <events.json> [--append]`

use std::path::PathBuf;

use dotenvy::dotenv;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use technexus_server::config::{Config, ConfigError};
use technexus_server::init_logging;
use technexus_server::store::{event_from_document, EventStore, PgEventStore, StoreError};

#[derive(Debug, Error)]
enum SeedError {
    #[error("usage: seed <events.json> [--append]")]
    Usage,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not a JSON array of event documents: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("document #{index} is invalid: {source}")]
    InvalidDocument { index: usize, source: StoreError },

    #[error(transparent)]
    Store(#[from] StoreError),
}

struct Args {
    path: PathBuf,
    append: bool,
}

fn parse_args() -> Result<Args, SeedError> {
    let mut path = None;
    let mut append = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--append" => append = true,
            _ if path.is_none() && !arg.starts_with("--") => path = Some(PathBuf::from(&arg)),
            _ => return Err(SeedError::Usage),
        }
    }

    Ok(Args {
        path: path.ok_or(SeedError::Usage)?,
        append,
    })
}

async fn run() -> Result<(), SeedError> {
    let args = parse_args()?;
    let config = Config::from_env()?;

    let raw = tokio::fs::read_to_string(&args.path)
        .await
        .map_err(|source| SeedError::Read {
            path: args.path.clone(),
            source,
        })?;
    let documents: Vec<Value> = serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
        path: args.path.clone(),
        source,
    })?;

    // Nothing is written unless every document decodes as an event.
    for (index, document) in documents.iter().enumerate() {
        event_from_document(document.clone())
            .map_err(|source| SeedError::InvalidDocument { index, source })?;
    }

    let store = PgEventStore::connect(&config).await?;
    store.migrate().await?;

    let loaded = store.load_documents(&documents, args.append).await;
    store.close().await;
    let written = loaded?;

    info!(
        written,
        append = args.append,
        "Seeded events from {}",
        args.path.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    if let Err(e) = run().await {
        error!("Seeding failed: {}", e);
        std::process::exit(1);
    }
}
