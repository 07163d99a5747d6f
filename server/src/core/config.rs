//! Server configuration
//!
//! Everything comes from the environment (a `.env` file is loaded in
//! `main`), with development-friendly defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::JwtConfig;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

/// Rate limit window settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory; the embedded database lives under it
    pub work_dir: PathBuf,
    pub http_port: u16,
    pub environment: Environment,
    pub jwt: JwtConfig,

    /// Razorpay credentials; absent in development, where the mock
    /// gateway is used instead
    pub razorpay_key_id: Option<String>,
    pub razorpay_key_secret: Option<String>,
    pub gateway_base_url: String,
    pub gateway_timeout_secs: u64,

    /// Days after delivery during which a return may be requested
    pub return_window_days: i64,
    pub otp_ttl_secs: u64,

    /// Strict window for /api/auth endpoints
    pub auth_rate_limit: RateLimitConfig,
    /// General API window
    pub general_rate_limit: RateLimitConfig,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Config {
    pub fn from_env() -> Self {
        let environment = match std::env::var("ENVIRONMENT").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        };

        Self {
            work_dir: std::env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            http_port: env_parse("HTTP_PORT", 8080),
            environment,
            jwt: JwtConfig::default(),
            razorpay_key_id: std::env::var("RAZORPAY_KEY_ID").ok(),
            razorpay_key_secret: std::env::var("RAZORPAY_KEY_SECRET").ok(),
            gateway_base_url: std::env::var("GATEWAY_BASE_URL")
                .unwrap_or_else(|_| "https://api.razorpay.com/v1".to_string()),
            gateway_timeout_secs: env_parse("GATEWAY_TIMEOUT_SECS", 15),
            return_window_days: env_parse("RETURN_WINDOW_DAYS", 7),
            otp_ttl_secs: env_parse("OTP_TTL_SECS", 300),
            // 5 auth attempts / 100 API calls per 15 minutes per client
            auth_rate_limit: RateLimitConfig {
                max_requests: env_parse("AUTH_RATE_LIMIT_MAX", 5),
                window_secs: env_parse("AUTH_RATE_LIMIT_WINDOW_SECS", 900),
            },
            general_rate_limit: RateLimitConfig {
                max_requests: env_parse("GENERAL_RATE_LIMIT_MAX", 100),
                window_secs: env_parse("GENERAL_RATE_LIMIT_WINDOW_SECS", 900),
            },
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.work_dir.join("marketplace.db")
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Secret used to verify payment signatures. Falls back to a fixed
    /// development secret when the mock gateway is in play.
    pub fn gateway_secret(&self) -> &str {
        self.razorpay_key_secret
            .as_deref()
            .unwrap_or("mock-gateway-secret")
    }
}
