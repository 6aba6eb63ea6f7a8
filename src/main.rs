//! Spindex - Spotify library CLI
//!
#![doc = "Spindex - Spotify library CLI"]
#![doc = "Main entry point for the spindex application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use spindex::cli::{Cli, Commands};
use spindex::commands;
use spindex::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Login => {
            tracing::info!("Starting interactive login");
            commands::login::run_login(config).await?;
            Ok(())
        }
        Commands::Whoami => {
            tracing::info!("Fetching user profile");
            commands::whoami::run_whoami(config).await?;
            Ok(())
        }
        Commands::Playlists { limit } => {
            tracing::info!("Listing playlists");
            if let Some(n) = limit {
                tracing::debug!("Display limited to {n} rows");
            }
            commands::playlists::run_playlists(config, limit).await?;
            Ok(())
        }
        Commands::Liked { limit } => {
            tracing::info!("Listing liked songs");
            if let Some(n) = limit {
                tracing::debug!("Display limited to {n} rows");
            }
            commands::liked::run_liked(config, limit).await?;
            Ok(())
        }
        Commands::Tracks { playlist } => {
            tracing::info!("Listing tracks of playlist '{playlist}'");
            commands::tracks::run_tracks(config, &playlist).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spindex=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
