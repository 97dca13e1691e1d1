use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;

use game_types::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    Ok,
    WrongPassword,
    UnknownUser,
}

/// Concurrent map of username to player record, with whole-file JSON
/// snapshot persistence.
///
/// Map-level operations are safe for concurrent distinct-key access. Field
/// mutations on a single record go through [`PlayerStore::with_player`],
/// which holds that record's shard lock for the duration of the closure, so
/// there is at most one writer per record at a time.
pub struct PlayerStore {
    players: DashMap<String, Player>,
    path: PathBuf,
    // Serializes snapshot writes across sessions and the rotation task.
    persist_lock: Mutex<()>,
}

impl PlayerStore {
    /// Load the store from its backing file. A missing file yields an empty
    /// store; a present but unreadable or malformed file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let players = DashMap::new();

        match std::fs::read(&path) {
            Ok(bytes) => {
                let snapshot: BTreeMap<String, Player> = serde_json::from_slice(&bytes)
                    .with_context(|| format!("malformed player file at {}", path.display()))?;
                for (username, player) in snapshot {
                    players.insert(username, player);
                }
                info!("Loaded {} players from {}", players.len(), path.display());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No player file at {}, starting empty", path.display());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("cannot read player file at {}", path.display()));
            }
        }

        Ok(Self { players, path, persist_lock: Mutex::new(()) })
    }

    /// Create a player if the username is free. Never overwrites an existing
    /// record.
    pub fn register(&self, username: &str, password: &str) -> RegisterOutcome {
        match self.players.entry(username.to_string()) {
            Entry::Occupied(_) => RegisterOutcome::AlreadyExists,
            Entry::Vacant(entry) => {
                entry.insert(Player::new(username, password));
                RegisterOutcome::Created
            }
        }
    }

    /// Cleartext password comparison, per the protocol contract.
    pub fn verify_credentials(&self, username: &str, password: &str) -> CredentialCheck {
        match self.players.get(username) {
            Some(player) if player.password == password => CredentialCheck::Ok,
            Some(_) => CredentialCheck::WrongPassword,
            None => CredentialCheck::UnknownUser,
        }
    }

    /// Snapshot clone of one player.
    pub fn get(&self, username: &str) -> Option<Player> {
        self.players.get(username).map(|p| p.value().clone())
    }

    /// Run `f` against one player's record under its shard lock. Returns
    /// `None` when the username is unknown.
    pub fn with_player<R>(&self, username: &str, f: impl FnOnce(&mut Player) -> R) -> Option<R> {
        self.players.get_mut(username).map(|mut p| f(p.value_mut()))
    }

    /// Visit every player mutably. Used only by rotation.
    pub fn for_each_player(&self, mut f: impl FnMut(&mut Player)) {
        for mut entry in self.players.iter_mut() {
            f(entry.value_mut());
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Write the whole store to the backing file as pretty JSON. The
    /// snapshot goes to a sibling temp file first and is renamed into place,
    /// and the read-state-plus-write region is one critical section, so
    /// concurrent persist calls never interleave partial writes.
    pub async fn persist(&self) -> Result<()> {
        let _guard = self.persist_lock.lock().await;

        let snapshot: BTreeMap<String, Player> = self
            .players
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        let json = serde_json::to_vec_pretty(&snapshot).context("cannot serialize players")?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &json)
            .with_context(|| format!("cannot write player file at {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("cannot replace player file at {}", self.path.display()))?;
        Ok(())
    }
}
