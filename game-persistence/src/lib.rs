pub mod store;

pub use store::{CredentialCheck, PlayerStore, RegisterOutcome};
