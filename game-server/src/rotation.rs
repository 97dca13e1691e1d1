use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::state::ServerState;
use game_types::Player;

/// One rotation firing: install a fresh secret word, reset every player's
/// per-day state, and persist the store. The new word is drawn uniformly and
/// is not guaranteed distinct from the previous one.
pub async fn rotate(state: &ServerState) -> Result<()> {
    let word = state.vocabulary.pick_random()?;
    *state.secret.write().await = word;

    state.store.for_each_player(Player::reset_daily);
    state.store.persist().await?;

    info!("Rotated secret word and reset {} players", state.store.len());
    Ok(())
}

/// Run rotation once per `period` on a single dedicated timer task. Firings
/// run inline on this task, so one firing can never overlap the next; a
/// failed firing is logged and abandoned, and the timer keeps going.
///
/// The caller is expected to have run the process-start firing already; the
/// first timed firing happens one full period in.
pub fn spawn(state: Arc<ServerState>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // interval's first tick completes immediately; the startup firing
        // already happened in main.
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = rotate(&state).await {
                error!("Word rotation failed: {:#}", e);
            }
        }
    })
}
