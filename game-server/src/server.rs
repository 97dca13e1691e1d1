use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::session;
use crate::state::ServerState;

/// Accept connections and run one session task per connection until
/// `shutdown` resolves. Then stop accepting, give in-flight sessions a
/// bounded grace period to finish, and force a final snapshot of the store.
pub async fn run(
    listener: TcpListener,
    state: Arc<ServerState>,
    shutdown: impl Future<Output = ()>,
    grace: Duration,
) -> Result<()> {
    let mut sessions = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, draining sessions...");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    info!("Accepted connection from {}", peer);
                    let state = state.clone();
                    sessions.spawn(async move {
                        match session::handle_session(stream, state).await {
                            Ok(()) => info!("Session from {} closed", peer),
                            Err(e) => warn!("Session from {} ended with error: {:#}", peer, e),
                        }
                    });
                }
                Err(e) => error!("Failed to accept connection: {}", e),
            }
        }
    }

    drop(listener);

    let drain = async {
        while sessions.join_next().await.is_some() {}
    };
    if tokio::time::timeout(grace, drain).await.is_err() {
        warn!("Sessions still running after grace period, aborting them");
        sessions.shutdown().await;
    }

    // Last write wins: whatever the sessions managed to do is snapshotted.
    state.store.persist().await?;
    info!("Final snapshot written, server stopped");
    Ok(())
}
