use bingo::{BingoError, BingoServerBuilder, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), BingoError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::load_or_default();
    tracing::info!(
        bind_addr = %config.bind_addr,
        idle_timeout = ?config.idle_timeout,
        winning_lines = config.room.winning_lines,
        "starting bingo server"
    );

    let server = BingoServerBuilder::from_config(config).build().await?;
    server.run().await
}
