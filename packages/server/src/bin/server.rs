//! BlipChat room relay server.
//!
//! Clients join one of a fixed set of rooms over WebSocket and exchange
//! messages with everyone currently in that room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin blipchat-server
//! cargo run --bin blipchat-server -- --port 3000 --rooms rooms.json
//! PORT=8080 cargo run --bin blipchat-server
//! ```

use std::{path::PathBuf, sync::Arc};

use blipchat_server::{
    infrastructure::{
        config::{self, ConfigError, DEFAULT_ADMIN_PASSWORD},
        message_pusher::WebSocketMessagePusher,
    },
    ui::Server,
    usecase::MembershipCoordinator,
};
use blipchat_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "blipchat-server")]
#[command(about = "Room-based WebSocket chat relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Maximum number of messages kept per room
    #[arg(long, env = "BLIPCHAT_HISTORY_CAPACITY", default_value = "25")]
    history_capacity: usize,

    /// JSON room catalog; the built-in catalog is used when omitted
    #[arg(long, env = "BLIPCHAT_ROOMS")]
    rooms: Option<PathBuf>,

    /// Secret of the built-in "Admin Room" (ignored with --rooms)
    #[arg(long, env = "BLIPCHAT_ADMIN_PASSWORD", default_value = DEFAULT_ADMIN_PASSWORD, hide_env_values = true)]
    admin_password: String,
}

fn build_coordinator(args: &Args) -> Result<MembershipCoordinator, ConfigError> {
    let catalog = match &args.rooms {
        Some(path) => config::load_catalog(path)?,
        None => config::default_catalog(&args.admin_password),
    };
    let registry = config::build_registry(catalog)?;
    let history_capacity = config::history_capacity(args.history_capacity)?;

    for room in registry.rooms() {
        tracing::info!(
            "Room '{}' ready ({})",
            room.name,
            if room.requires_secret() { "protected" } else { "open" }
        );
    }

    Ok(MembershipCoordinator::with_options(
        registry,
        Arc::new(WebSocketMessagePusher::new()),
        history_capacity,
        Arc::new(SystemClock),
    ))
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Room catalog (Registry)
    // 2. MessagePusher
    // 3. MembershipCoordinator
    // 4. Server
    let coordinator = match build_coordinator(&args) {
        Ok(coordinator) => Arc::new(coordinator),
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let server = Server::new(coordinator);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
