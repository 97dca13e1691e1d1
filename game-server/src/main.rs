use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use game_core::Vocabulary;
use game_persistence::PlayerStore;
use game_server::{broadcast::Notifier, config::Config, rotation, server, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Wordle server...");

    let config = Config::new();

    let vocabulary = match Vocabulary::open(&config.words_file) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("Failed to open word list '{}': {:#}", config.words_file, e);
            tracing::error!("The server requires a sorted fixed-width word list to function.");
            tracing::error!("Set WORDS_FILE to point to a file of newline-delimited 10-letter words.");
            std::process::exit(1);
        }
    };

    let store = match PlayerStore::load(&config.users_file) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to load player file '{}': {:#}", config.users_file, e);
            std::process::exit(1);
        }
    };

    let multicast_target = format!("{}:{}", config.multicast_addr, config.multicast_port)
        .parse()
        .expect("Invalid MULTICAST_ADDR/MULTICAST_PORT");
    let notifier = Notifier::bind(multicast_target).await?;

    let state = Arc::new(ServerState::new(store, vocabulary, notifier));

    // Process-start rotation firing: install the first secret word and reset
    // everyone's daily state before the listener opens.
    rotation::rotate(&state).await?;
    let _rotation = rotation::spawn(
        state.clone(),
        Duration::from_secs(config.rotation_period_secs),
    );

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("Server listening on {}:{}", config.host, config.port);

    let shutdown = async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint =
                signal::unix::signal(signal::unix::SignalKind::interrupt()).unwrap();
            let mut sigterm =
                signal::unix::signal(signal::unix::SignalKind::terminate()).unwrap();

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    };

    server::run(
        listener,
        state,
        shutdown,
        Duration::from_secs(config.shutdown_grace_secs),
    )
    .await?;

    info!("Server shutdown complete.");
    Ok(())
}
