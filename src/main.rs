use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use favicon_proxy::{
    config::Config, fetcher::FaviconFetcher, popular::PopularIconStore, services::IconResolver,
    web::WebServer,
};

#[derive(Parser)]
#[command(name = "favicon-proxy")]
#[command(version = "0.1.0")]
#[command(about = "A favicon resolution service with popular-site caching and fallback icons")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("favicon_proxy={},tower_http=trace", cli.log_level)
    } else {
        format!("favicon_proxy={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting favicon proxy v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration from specified file
    std::env::set_var("CONFIG_FILE", &cli.config);
    let mut config = Config::load()?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }

    let popular = Arc::new(PopularIconStore::load(&config.popular.dataset_path)?);
    let fetcher = Arc::new(FaviconFetcher::new(&config.fetch));
    let resolver = IconResolver::new(popular, fetcher);
    info!("Icon resolution service initialized");

    let web_server = WebServer::new(config, resolver)?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;

    Ok(())
}
