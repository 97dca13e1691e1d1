pub mod round;
pub mod vocabulary;

pub use round::{apply_guess, feedback_code, GuessOutcome, ALL_HIT};
pub use vocabulary::Vocabulary;
