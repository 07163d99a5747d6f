//! Authentication module
//!
//! JWT issuance/validation, the auth middleware stack, the OTP cache and
//! per-IP rate limiting.

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod otp;
pub mod rate_limit;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use otp::OtpCache;
pub use rate_limit::{RateLimiter, rate_limit};
