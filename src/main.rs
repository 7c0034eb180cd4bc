pub mod types;
pub mod config;
pub mod error;
pub mod data;
pub mod processing;
pub mod render;
pub mod page;
pub mod upload;
pub mod server;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve one map built from the bundled CSV
    Static {
        /// Defaults to ./config.toml when present, built-in settings otherwise
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Serve the upload page and render a map for each uploaded CSV
    Upload {
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Static { config } => {
            let app_config = config::AppConfig::resolve(config.as_deref())?;
            tracing::info!("Building static map from {:?}", app_config.input.data_csv);
            server::start_static_server(app_config).await?;
        }
        Commands::Upload { config } => {
            let app_config = config::AppConfig::resolve(config.as_deref())?;
            tracing::info!("Serving upload page");
            server::start_upload_server(app_config).await?;
        }
    }

    Ok(())
}
