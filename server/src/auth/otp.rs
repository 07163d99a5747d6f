//! OTP cache
//!
//! Short-lived one-time codes for mobile verification, kept in memory.
//! There is no SMS integration; codes are logged at debug level so
//! development and staging can complete the flow.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use ring::rand::{SecureRandom, SystemRandom};

use crate::security_log;

const MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone)]
struct OtpEntry {
    code: String,
    issued_at: Instant,
    attempts: u32,
}

/// In-memory OTP store keyed by mobile number
pub struct OtpCache {
    entries: DashMap<String, OtpEntry>,
    ttl: Duration,
    rng: SystemRandom,
}

impl OtpCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            rng: SystemRandom::new(),
        }
    }

    /// Issue a fresh 6-digit code for a mobile number, replacing any
    /// outstanding one.
    pub fn issue(&self, mobile: &str) -> String {
        let code = self.generate_code();
        self.entries.insert(
            mobile.to_string(),
            OtpEntry {
                code: code.clone(),
                issued_at: Instant::now(),
                attempts: 0,
            },
        );
        tracing::debug!(mobile = %mobile, code = %code, "OTP issued");
        code
    }

    /// Check a submitted code. The entry is consumed on success and after
    /// too many failed attempts; an expired entry never matches.
    pub fn verify(&self, mobile: &str, code: &str) -> bool {
        let Some(mut entry) = self.entries.get_mut(mobile) else {
            return false;
        };

        if entry.issued_at.elapsed() > self.ttl {
            drop(entry);
            self.entries.remove(mobile);
            return false;
        }

        if entry.code == code {
            drop(entry);
            self.entries.remove(mobile);
            return true;
        }

        entry.attempts += 1;
        let exhausted = entry.attempts >= MAX_ATTEMPTS;
        drop(entry);
        if exhausted {
            security_log!("WARN", "otp_attempts_exhausted", mobile = mobile.to_string());
            self.entries.remove(mobile);
        }
        false
    }

    fn generate_code(&self) -> String {
        let mut bytes = [0u8; 4];
        if self.rng.fill(&mut bytes).is_err() {
            // SystemRandom failure is not recoverable at this layer
            tracing::error!("System RNG failure while generating OTP");
        }
        let number = u32::from_be_bytes(bytes) % 1_000_000;
        format!("{:06}", number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let cache = OtpCache::new(Duration::from_secs(300));
        let code = cache.issue("+919876543210");

        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
        assert!(cache.verify("+919876543210", &code));
    }

    #[test]
    fn test_code_is_consumed_on_success() {
        let cache = OtpCache::new(Duration::from_secs(300));
        let code = cache.issue("+919876543210");

        assert!(cache.verify("+919876543210", &code));
        assert!(!cache.verify("+919876543210", &code));
    }

    #[test]
    fn test_wrong_code_rejected() {
        let cache = OtpCache::new(Duration::from_secs(300));
        let code = cache.issue("+919876543210");

        assert!(!cache.verify("+919876543210", "000000") || code == "000000");
    }

    #[test]
    fn test_expired_code_rejected() {
        let cache = OtpCache::new(Duration::from_millis(1));
        let code = cache.issue("+919876543210");

        std::thread::sleep(Duration::from_millis(10));
        assert!(!cache.verify("+919876543210", &code));
    }

    #[test]
    fn test_attempts_exhaust_the_code() {
        let cache = OtpCache::new(Duration::from_secs(300));
        let code = cache.issue("+919876543210");
        let wrong = if code == "111111" { "222222" } else { "111111" };

        for _ in 0..MAX_ATTEMPTS {
            assert!(!cache.verify("+919876543210", wrong));
        }
        // Entry removed after exhaustion, the real code no longer works
        assert!(!cache.verify("+919876543210", &code));
    }

    #[test]
    fn test_reissue_replaces_previous_code() {
        let cache = OtpCache::new(Duration::from_secs(300));
        let first = cache.issue("+919876543210");
        let second = cache.issue("+919876543210");

        if first != second {
            assert!(!cache.verify("+919876543210", &first));
        }
        assert!(cache.verify("+919876543210", &second));
    }
}
