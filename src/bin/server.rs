use anyhow::Result;
use paytrack::config::AppConfig;
use paytrack::logging;
use paytrack::server::{ServerBuilder, ServerHost};
use paytrack::storage::Stores;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init(&config.logging);

    tracing::info!(
        backend = ?config.storage.backend,
        database = %config.storage.database,
        "connecting to storage"
    );
    let stores = Stores::from_config(&config.storage).await?;

    ServerBuilder::new()
        .with_host(ServerHost::from_stores(stores))
        .with_cors_origins(config.server.cors_origins.clone())
        .serve(config.bind_addr()?)
        .await
}
