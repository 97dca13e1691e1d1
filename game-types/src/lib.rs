pub mod errors;
pub mod player;
pub mod protocol;

// Re-export all types
pub use errors::*;
pub use player::*;
pub use protocol::*;
