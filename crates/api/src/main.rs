use anyhow::Context;

use itemtrack_api::app::{AppServices, build_app};
use itemtrack_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    itemtrack_observability::init(config.log_format);

    let services = AppServices::sqlite(&config.database_url)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    let app = build_app(services, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server terminated")?;
    Ok(())
}
