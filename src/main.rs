//! `spa-proxy` binary: load configuration, start logging, serve.

use std::path::PathBuf;

use clap::Parser;

use spa_proxy::config::{load_config, ConfigOverrides};
use spa_proxy::lifecycle::{bind_listener, wait_for_shutdown_signal, Shutdown, StartupError};
use spa_proxy::observability::{init_logging, metrics};
use spa_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "spa-proxy")]
#[command(about = "Serves the chat SPA bundle and proxies /api/ to the chat API", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Upstream API base URL (overrides API_URL)
    #[arg(short, long)]
    upstream: Option<String>,

    /// Static bundle directory (overrides ASSET_ROOT)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Serve the /debug configuration snapshot
    #[arg(long)]
    enable_debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        port: cli.port,
        upstream: cli.upstream,
        root: cli.root,
        enable_debug: cli.enable_debug,
    };
    let config = load_config(cli.config.as_deref(), &overrides)?;

    init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        asset_root = %config.static_files.root.display(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = bind_listener(&config).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let on_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, on_shutdown).await.map_err(StartupError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
