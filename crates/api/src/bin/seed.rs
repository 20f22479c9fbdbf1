//! Inserts a few demo items into the configured database.

use anyhow::Context;

use itemtrack_infra::{AppConfig, SqliteItemStore, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    itemtrack_observability::init(config.log_format);

    let store = SqliteItemStore::connect(&config.database_url)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    let ids = seed::seed_demo_items(&store)
        .await
        .context("failed to insert demo items")?;

    tracing::info!(count = ids.len(), database_url = %config.database_url, "demo items inserted");
    Ok(())
}
