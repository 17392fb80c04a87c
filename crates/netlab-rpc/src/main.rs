//! netlab RPC server - JSON-RPC backend for the network demo front-end.
//!
//! This binary provides a JSON-RPC 2.0 server that wraps the netlab-core
//! library so a UI can trigger requests and poll the network log.

mod handlers;
mod server;
mod wrapper;

use anyhow::Result;
use clap::Parser;
use netlab_core::{ClientConfig, NetLab};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "netlab-rpc")]
#[command(about = "JSON-RPC server for the netlab network demos")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "0")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Upstream API base URL (overrides NETLAB_API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Bearer token for upstream requests (overrides NETLAB_API_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Number of network events to keep
    #[arg(long, default_value_t = netlab_core::NetworkConfig::LOG_CAPACITY)]
    log_capacity: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting netlab RPC server");

    let mut config = ClientConfig::from_env();
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(token) = args.token {
        config.token = Some(token);
    }
    info!("Upstream API: {}", config.base_url);

    let lab = NetLab::builder(config)
        .log_capacity(args.log_capacity)
        .build()?;

    let addr = server::start_server(lab, &args.host, args.port).await?;

    // Front-ends read the port from stdout.
    println!("RPC_PORT={}", addr.port());

    info!("RPC server running on {}", addr);

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
