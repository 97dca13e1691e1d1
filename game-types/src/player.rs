use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Length of every secret and guess word.
pub const WORD_LEN: usize = 10;

/// Trials granted per rotation period.
pub const MAX_TRIALS: u8 = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub username: String,
    pub password: String,
    pub matches_played: u32,
    pub matches_won: u32,
    pub last_streak: u32,
    pub streak_record: u32,
    pub last_match_won: bool,
    pub remaining_trials: u8,
    pub has_won_today: bool,
    /// Wins per attempt number, keys 1..=12. All keys are present from
    /// creation so the stats payload always carries twelve counters.
    pub guess_distribution: BTreeMap<u8, u32>,
    /// Feedback codes for the guesses submitted this round, in order.
    pub feedback: Vec<String>,
}

impl Player {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let guess_distribution = (1..=MAX_TRIALS).map(|i| (i, 0)).collect();
        Self {
            username: username.into(),
            password: password.into(),
            matches_played: 0,
            matches_won: 0,
            last_streak: 0,
            streak_record: 0,
            last_match_won: false,
            remaining_trials: MAX_TRIALS,
            has_won_today: false,
            guess_distribution,
            feedback: Vec::new(),
        }
    }

    /// Start a fresh rotation period. Lifetime stats are untouched.
    pub fn reset_daily(&mut self) {
        self.remaining_trials = MAX_TRIALS;
        self.has_won_today = false;
        self.feedback.clear();
    }

    pub fn win_rate(&self) -> f32 {
        self.matches_won as f32 / self.matches_played as f32
    }

    /// True once the player has submitted at least one guess this round.
    pub fn has_guessed_today(&self) -> bool {
        self.remaining_trials < MAX_TRIALS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_defaults() {
        let player = Player::new("ann", "pw1");
        assert_eq!(player.remaining_trials, MAX_TRIALS);
        assert_eq!(player.matches_played, 0);
        assert!(!player.has_won_today);
        assert!(!player.has_guessed_today());
        assert_eq!(player.guess_distribution.len(), 12);
        assert!(player.guess_distribution.values().all(|&v| v == 0));
    }

    #[test]
    fn test_reset_daily_keeps_lifetime_stats() {
        let mut player = Player::new("ann", "pw1");
        player.matches_played = 5;
        player.matches_won = 3;
        player.last_streak = 2;
        player.remaining_trials = 0;
        player.has_won_today = true;
        player.feedback.push("++++++++++".to_string());

        player.reset_daily();

        assert_eq!(player.remaining_trials, MAX_TRIALS);
        assert!(!player.has_won_today);
        assert!(player.feedback.is_empty());
        assert_eq!(player.matches_played, 5);
        assert_eq!(player.matches_won, 3);
        assert_eq!(player.last_streak, 2);
    }
}
