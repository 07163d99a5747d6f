//! Core module: configuration, shared state and the server lifecycle

pub mod config;
pub mod server;
pub mod state;

pub use config::{Config, Environment, RateLimitConfig};
pub use server::Server;
pub use state::ServerState;
