use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use photo_restorer::cli::enhance_file;
use photo_restorer::config::{Config, DEFAULT_BIND_ADDR, DOWNLOAD_FILE_NAME};
use photo_restorer::web::{build_router, AppState};
use photo_restorer::{Gateway, GeminiClient};

#[derive(Parser)]
#[command(name = "photo-restorer")]
#[command(about = "Restore old photos with a generative image model")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web UI (default)
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = DEFAULT_BIND_ADDR)]
        bind: SocketAddr,
    },
    /// Enhance a single photo and write the result to disk
    Enhance {
        /// Photo to restore
        input: PathBuf,

        /// Where to write the result (defaults to enhanced-photo.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photo_restorer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Some(Commands::Enhance { input, output }) => {
            let output = output.unwrap_or_else(|| PathBuf::from(DOWNLOAD_FILE_NAME));
            run_enhance_command(config, &input, &output).await
        }
        Some(Commands::Serve { bind }) => run_server(config.with_bind(bind)).await,
        None => run_server(config).await,
    }
}

fn build_gateway(config: &Config) -> Gateway {
    Gateway::new(Arc::new(GeminiClient::new(
        config.api_base.clone(),
        config.api_key.clone(),
    )))
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let state = AppState::new(build_gateway(&config));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(addr = %config.bind, "Photo restorer listening");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_enhance_command(config: Config, input: &Path, output: &Path) -> anyhow::Result<()> {
    let download = enhance_file(&build_gateway(&config), input, output).await?;
    println!(
        "Saved {} ({} bytes) to {}",
        download.media_type,
        download.bytes.len(),
        output.display()
    );
    Ok(())
}
