use dashmap::DashSet;
use tokio::sync::RwLock;

use crate::broadcast::Notifier;
use game_core::Vocabulary;
use game_persistence::PlayerStore;

/// Everything the session engine and the rotation scheduler share. Owned
/// once, handed out behind an `Arc`; never ambient global state.
pub struct ServerState {
    pub store: PlayerStore,
    pub vocabulary: Vocabulary,
    /// Current secret word. Written only by rotation, read by every session.
    /// Empty until the first rotation firing installs a word.
    pub secret: RwLock<String>,
    pub notifier: Notifier,
    pub sessions: SessionRegistry,
}

impl ServerState {
    pub fn new(store: PlayerStore, vocabulary: Vocabulary, notifier: Notifier) -> Self {
        Self {
            store,
            vocabulary,
            secret: RwLock::new(String::new()),
            notifier,
            sessions: SessionRegistry::new(),
        }
    }
}

/// Tracks which usernames currently have a live authenticated session, so a
/// second concurrent login for the same account is rejected and each player
/// record has exactly one owning session at a time.
pub struct SessionRegistry {
    active: DashSet<String>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self { active: DashSet::new() }
    }

    /// Claim a username for a session. Returns false when another live
    /// session already holds it.
    pub fn claim(&self, username: &str) -> bool {
        self.active.insert(username.to_string())
    }

    pub fn release(&self, username: &str) {
        self.active.remove(username);
    }

    pub fn is_active(&self, username: &str) -> bool {
        self.active.contains(username)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_is_exclusive() {
        let registry = SessionRegistry::new();
        assert!(registry.claim("ann"));
        assert!(!registry.claim("ann"));
        assert!(registry.is_active("ann"));

        registry.release("ann");
        assert!(!registry.is_active("ann"));
        assert!(registry.claim("ann"));
    }
}
