mod boot;
mod cli;
mod driver;

use std::sync::Arc;

use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use tilemux_pty::NativePtyRegistry;
use tilemux_session::{Command, SessionActor, TerminalStore};

#[tokio::main]
async fn main() {
    let args = cli::parse();

    // stdout carries replies, so logs go to stderr.
    let log_directive = args.log_level.as_deref().unwrap_or("tilemux=info");
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "tilemux=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("tilemux v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = tilemux_platform::ensure_dirs() {
        tracing::warn!("Failed to create directories: {e}");
    }

    if let Some(ref dir) = args.directory {
        if let Err(e) = std::env::set_current_dir(dir) {
            tracing::warn!("Failed to change directory to {dir}: {e}");
        }
    }

    let config = Arc::new(boot::config_source(&args));
    let restore = boot::should_restore(&args, config.as_ref());

    let (pty_tx, pty_rx) = tilemux_pty::event_channel();
    let ptys = Arc::new(NativePtyRegistry::new(pty_tx));
    let store = TerminalStore::new(config, ptys, boot::blob_store());
    let (actor, handle) = SessionActor::new(store, pty_rx);
    let actor_task = tokio::spawn(actor.run());

    if let Err(e) = boot::start_session(&handle, restore).await {
        tracing::warn!("Startup session failed: {e}");
    }

    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = driver::serve(&handle, stdin, tokio::io::stdout()) => {
            if let Err(e) = result {
                tracing::error!("Command stream error: {e}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupt received");
        }
    }

    // Already stopped if the stream ended with a shutdown command.
    if let Err(e) = handle.dispatch(Command::Shutdown).await {
        tracing::debug!("Shutdown: {e}");
    }
    if let Err(e) = actor_task.await {
        tracing::error!("Session actor panicked: {e}");
    }
    tracing::info!("Shutdown complete");
}
