pub mod broadcast;
pub mod config;
pub mod rotation;
pub mod server;
pub mod session;
pub mod state;

pub use config::Config;
pub use state::{ServerState, SessionRegistry};
