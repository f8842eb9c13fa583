use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use fakeart::prelude::*;
use tracing_subscriber::EnvFilter;

/// Fake artist game server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, short, default_value_t = 8080)]
    port: u16,

    /// Maximum number of rooms alive at once.
    #[arg(long, default_value_t = 1000)]
    max_rooms: usize,

    /// Seconds a room with nobody connected is kept for rejoins.
    #[arg(long, default_value_t = 60)]
    teardown_secs: u64,

    /// JSON file with an array of `{"keyword": ..., "hint": ...}` to use
    /// instead of the built-in prompts.
    #[arg(long)]
    prompts: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), FakeArtError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let prompts = match &args.prompts {
        Some(path) => PromptPool::from_file(path)?,
        None => PromptPool::builtin(),
    };
    tracing::info!(prompts = prompts.len(), "prompt pool loaded");

    let server = FakeArtServer::builder()
        .bind(&format!("{}:{}", args.host, args.port))
        .lobby_config(LobbyConfig {
            max_rooms: args.max_rooms,
            teardown_delay: Duration::from_secs(args.teardown_secs),
            ..LobbyConfig::default()
        })
        .prompts(prompts)
        .build()
        .await?;

    server.run().await
}
