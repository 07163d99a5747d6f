//! Per-IP rate limiting
//!
//! Fixed-window counters held in a [`DashMap`]. Two tiers: a strict
//! window for the auth endpoints (credential stuffing) and a general
//! window for the rest of the API.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use dashmap::DashMap;

use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window rate limiter keyed by client address
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    /// Count one request for `key`, returning false once the window's
    /// budget is spent.
    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(entry.started_at) > self.window {
            entry.started_at = now;
            entry.count = 0;
        }

        entry.count += 1;
        let allowed = entry.count <= self.max_requests;
        drop(entry);

        // Opportunistic cleanup so the map doesn't grow unbounded
        if self.windows.len() > 10_000 {
            let window = self.window;
            self.windows
                .retain(|_, w| now.duration_since(w.started_at) <= window);
        }

        allowed
    }
}

/// Best-effort client address: X-Forwarded-For first, then the socket peer
fn client_key(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limit middleware. Auth endpoints draw from the strict limiter,
/// everything else from the general one.
pub async fn rate_limit(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();
    let key = client_key(&req);

    let (limiter, tier) = if path.starts_with("/api/auth/") {
        (state.auth_limiter(), "auth")
    } else {
        (state.general_limiter(), "general")
    };

    if !limiter.allow(&key) {
        security_log!(
            "WARN",
            "rate_limited",
            client = key,
            tier = tier,
            path = path.to_string()
        );
        return Err(AppError::too_many_requests(
            "Too many requests, please try again later",
        ));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.2"));
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_millis(5));

        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
        std::thread::sleep(Duration::from_millis(15));
        assert!(limiter.allow("10.0.0.1"));
    }
}
