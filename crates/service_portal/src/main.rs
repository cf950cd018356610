//! Structura portal server
//!
//! Public site, client space and JSON proxy of the product data service.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use service_portal::config::{build_config, CliArgs as ConfigCliArgs};
use service_portal::server::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Structura portal server
#[derive(Parser, Debug)]
#[command(name = "service_portal")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long, env = "PORTAL_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORTAL_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PORTAL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Environment (development, staging, production)
    #[arg(long, env = "PORTAL_ENVIRONMENT")]
    environment: Option<String>,

    /// Base URL of the product data service
    #[arg(long, env = "PORTAL_BACKEND_URL")]
    backend_url: Option<String>,
}

impl From<Args> for ConfigCliArgs {
    fn from(args: Args) -> Self {
        ConfigCliArgs {
            config_file: args.config,
            host: args.host,
            port: args.port,
            log_level: args.log_level,
            environment: args.environment,
            backend_url: args.backend_url,
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cli_args: ConfigCliArgs = args.into();
    let config = build_config(&cli_args).context("Invalid configuration")?;

    init_tracing(config.log_level.as_filter_str());

    tracing::info!("Structura portal v{}", service_portal::VERSION);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        log_level = %config.log_level,
        environment = %config.environment,
        backend_url = %config.backend_url,
        session_ttl_secs = config.session_ttl_secs,
        static_dir = %config.static_dir.display(),
        "Server configuration loaded"
    );

    let server = Server::new(config).context("Failed to build the data service client")?;
    let addr = server.socket_addr().context("Invalid listen address")?;
    tracing::info!(address = %addr, "Starting server");

    server.run().await.context("Server error")?;

    Ok(())
}
