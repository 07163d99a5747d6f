//! JWT token service
//!
//! Token generation, validation and parsing for the marketplace API.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::UserRole;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: load_jwt_secret(),
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 24 hours
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "vinimai-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "vinimai-app".to_string()),
        }
    }
}

/// Load the signing secret from the environment. In debug builds a missing
/// or short secret falls back to a generated one; release builds refuse to
/// start without a proper secret.
fn load_jwt_secret() -> String {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= 32 => secret,
        _ => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("JWT_SECRET not set or too short, generating a temporary key");
                generate_printable_secret()
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("JWT_SECRET must be set to at least 32 characters in production");
            }
        }
    }
}

/// Generate a 64-character printable secret (development only)
fn generate_printable_secret() -> String {
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";
    let rng = SystemRandom::new();
    let mut key = String::new();
    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            return "vinimai-development-fallback-secret-key-2025".to_string();
        }
        let idx = (byte[0] as usize) % allowed_chars.len();
        key.push(allowed_chars.as_bytes()[idx] as char);
    }
    key
}

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (subject), "user:xyz" form
    pub sub: String,
    pub username: String,
    pub role: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT token service
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue an access token for a user
    pub fn generate_token(
        &self,
        user_id: &str,
        username: &str,
        role: UserRole,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.as_str().to_string(),
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an Authorization header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Authenticated user context, parsed from the token claims.
///
/// Created by the auth middleware and injected into request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User id in "user:xyz" form
    pub id: String,
    pub username: String,
    pub role: UserRole,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, JwtError> {
        let role: UserRole = claims
            .role
            .parse()
            .map_err(|_| JwtError::InvalidToken(format!("Unknown role: {}", claims.role)))?;

        Ok(Self {
            id: claims.sub,
            username: claims.username,
            role,
        })
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-key-that-is-long-enough-for-hs256".to_string(),
            expiration_minutes: 60,
            issuer: "vinimai-server".to_string(),
            audience: "vinimai-app".to_string(),
        })
    }

    #[test]
    fn test_token_generation_and_validation() {
        let service = test_service();

        let token = service
            .generate_token("user:abc", "ravi_k", UserRole::Seller)
            .expect("Failed to generate token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate token");

        assert_eq!(claims.sub, "user:abc");
        assert_eq!(claims.username, "ravi_k");
        assert_eq!(claims.role, "seller");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = test_service();
        let token = service
            .generate_token("user:abc", "ravi_k", UserRole::Buyer)
            .expect("Failed to generate token");

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.validate_token(&tampered).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = test_service();
        let other = JwtService::with_config(JwtConfig {
            secret: "a-completely-different-secret-key-material".to_string(),
            ..service.config.clone()
        });

        let token = service
            .generate_token("user:abc", "ravi_k", UserRole::Buyer)
            .expect("Failed to generate token");

        assert!(matches!(
            other.validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_current_user_from_claims() {
        let service = test_service();
        let token = service
            .generate_token("user:abc", "admin_meera", UserRole::Admin)
            .expect("Failed to generate token");
        let claims = service.validate_token(&token).expect("valid token");

        let user = CurrentUser::try_from(claims).expect("valid role");
        assert!(user.is_admin());
        assert_eq!(user.id, "user:abc");
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(
            JwtService::extract_from_header("Bearer abc.def.ghi"),
            Some("abc.def.ghi")
        );
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
