use game_types::{Player, MAX_TRIALS, WORD_LEN};

/// Feedback code returned for a winning guess.
pub const ALL_HIT: &str = "++++++++++";

const HIT: char = '+';
const PRESENT: char = '?';
const MISS: char = 'x';

/// Result of applying one guess to a player's round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The guess matched the secret word. `attempt` is the 1-based guess
    /// number the win was recorded at.
    Win { attempt: u8 },
    /// Valid guess, didn't match; trials remain.
    Hint { code: String, remaining: u8 },
    /// Valid guess, didn't match, and it was the last trial of the round.
    OutOfTrials { code: String },
    /// The word is not in the vocabulary. Nothing was mutated.
    NotInVocabulary,
}

/// Per-character comparison of a guess against the secret: exact positional
/// match, present elsewhere in the secret, or absent.
pub fn feedback_code(guess: &str, secret: &str) -> String {
    let guess = guess.as_bytes();
    let secret = secret.as_bytes();
    (0..WORD_LEN)
        .map(|i| {
            if guess[i] == secret[i] {
                HIT
            } else if secret.contains(&guess[i]) {
                PRESENT
            } else {
                MISS
            }
        })
        .collect()
}

/// Apply one guess to `player`, mutating its round and lifetime stats.
///
/// The caller is responsible for the vocabulary lookup (`in_vocabulary`); it
/// is only consulted when the guess does not equal the secret, so an exact
/// match wins even without a vocabulary read. A word outside the vocabulary
/// leaves the player untouched.
pub fn apply_guess(
    player: &mut Player,
    guess: &str,
    secret: &str,
    in_vocabulary: bool,
) -> GuessOutcome {
    if guess == secret {
        if player.remaining_trials == MAX_TRIALS {
            player.matches_played += 1;
        }
        let attempt = MAX_TRIALS - player.remaining_trials + 1;
        player.feedback.push(ALL_HIT.to_string());
        *player.guess_distribution.entry(attempt).or_insert(0) += 1;
        player.remaining_trials = player.remaining_trials.saturating_sub(1);
        player.matches_won += 1;
        player.has_won_today = true;
        player.last_match_won = true;
        player.last_streak += 1;
        if player.last_streak > player.streak_record {
            player.streak_record = player.last_streak;
        }
        return GuessOutcome::Win { attempt };
    }

    if !in_vocabulary {
        return GuessOutcome::NotInVocabulary;
    }

    if player.remaining_trials == MAX_TRIALS {
        player.matches_played += 1;
    }
    player.remaining_trials = player.remaining_trials.saturating_sub(1);
    let code = feedback_code(guess, secret);
    player.feedback.push(code.clone());

    if player.remaining_trials > 0 {
        GuessOutcome::Hint { code, remaining: player.remaining_trials }
    } else {
        // Round lost: the streak breaks here, not at rotation.
        player.last_streak = 0;
        player.last_match_won = false;
        GuessOutcome::OutOfTrials { code }
    }
}
