//! Vinimai Marketplace Server
//!
//! Peer-to-peer exchange marketplace backend: sellers list products
//! through a moderation queue, buyers negotiate via offers, orders carry
//! a 3%-each-side commission and are paid through a Razorpay-style
//! gateway with local signature verification.
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/      # config, shared state, server lifecycle
//! ├── auth/      # JWT, middleware, OTP cache, rate limiting
//! ├── api/       # HTTP routes and handlers
//! ├── db/        # embedded SurrealDB: models + repositories
//! ├── fees/      # commission math (Decimal-exact)
//! ├── payment/   # gateway client + signature verification
//! ├── services/  # notification fan-out
//! └── utils/     # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod fees;
pub mod payment;
pub mod services;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured events on the "security" target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
