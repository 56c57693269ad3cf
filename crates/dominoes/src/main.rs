use dominoes::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), DominoesError> {
    // RUST_LOG=dominoes_room=debug shows every play.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .compact()
        .init();

    let config = ServerConfig::from_env()?;
    let server = DominoesServer::builder()
        .bind(&config.bind_addr())
        .room_config(config.room_config())
        .build()
        .await?;

    tracing::info!(addr = %server.local_addr()?, seeded = config.deal_seed.is_some(), "dominoes server listening");
    server.run().await
}
