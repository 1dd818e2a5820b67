use anyhow::{Context, Result};
use clap::Parser;
use kiosklink_server::ServerConfig;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kiosklink-broker")]
#[command(about = "WebSocket signaling broker pairing kiosks with customers")]
struct Args {
    /// Address the HTTP/WebSocket listener binds to.
    #[arg(long, env = "KIOSKLINK_BIND", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    #[arg(long, env = "KIOSKLINK_PING_INTERVAL_SECS", default_value_t = 15)]
    ping_interval_secs: u64,

    /// Close sockets that send nothing for this long.
    #[arg(long, env = "KIOSKLINK_IDLE_TIMEOUT_SECS", default_value_t = 45)]
    idle_timeout_secs: u64,

    #[arg(long, env = "KIOSKLINK_MAX_FRAME_BYTES", default_value_t = 64 * 1024)]
    max_frame_bytes: usize,

    /// tracing filter directive, used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_filter: String,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            ping_interval: Duration::from_secs(self.ping_interval_secs),
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
            max_frame_bytes: self.max_frame_bytes,
            ..ServerConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_filter))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = args.into_config();
    info!("Starting signaling broker with {:?}", config);

    kiosklink_server::serve(config, shutdown_signal())
        .await
        .context("Signaling broker failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
