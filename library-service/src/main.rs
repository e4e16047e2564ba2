use anyhow::Context;
use library_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config)?;

    tracing::info!(
        service = %config.service.name,
        environment = %config.service.environment,
        "Configuration loaded"
    );

    let state = AppState::connect(config.clone())
        .await
        .context("failed to open the record store")?;

    Server::new(config).serve(router(state)).await?;
    Ok(())
}
