//! To-do service (v1)
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id / trace / timeout / body limit
//!                         │
//!                         ▼
//!                     route table (method + path)
//!                         │
//!                         ▼
//!                     guards, in order ──── reject ──▶ { "error": ... }
//!                         │
//!                         ▼
//!                     handler ◀──▶ UserStore (in memory)
//!                         │
//!     Client Response ◀───┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use todo_service::config::{load_config, watcher::ConfigWatcher, ServiceConfig};
use todo_service::observability::init_logging;
use todo_service::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "todo-service")]
#[command(about = "Multi-tenant to-do list HTTP service", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload the config file when it changes.
    #[arg(long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    init_logging(&config.observability.log_level);
    tracing::info!("todo-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        free_tier_todo_limit = config.limits.free_tier_todo_limit,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // The watcher handle has to outlive the server.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => (None, mpsc::unbounded_channel().1),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
