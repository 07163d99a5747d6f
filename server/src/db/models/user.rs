//! User Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// User ID type
pub type UserId = RecordId;

/// Account role. One role per user; role determines capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Buyer,
    Seller,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Buyer => "buyer",
            UserRole::Seller => "seller",
            UserRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(UserRole::Buyer),
            "seller" => Ok(UserRole::Seller),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// User account. The mobile number is the primary login credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,
    pub username: String,
    pub mobile: String,
    pub email: Option<String>,
    pub hash_pass: String,
    pub role: UserRole,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Create user payload (registration)
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub mobile: String,
    pub email: Option<String>,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: UserRole,
}

fn default_role() -> UserRole {
    UserRole::Buyer
}

/// API-safe view of an account: everything except the password hash
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    #[serde(with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,
    pub username: String,
    pub mobile: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            mobile: user.mobile.clone(),
            email: user.email.clone(),
            role: user.role,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = User::hash_password("Secure@123").expect("hashing must succeed");
        let user = User {
            id: None,
            username: "asha".to_string(),
            mobile: "9876543210".to_string(),
            email: None,
            hash_pass: hash,
            role: UserRole::Buyer,
            is_verified: false,
            created_at: Utc::now(),
        };

        assert!(user.verify_password("Secure@123").unwrap());
        assert!(!user.verify_password("wrong-password").unwrap());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("seller".parse::<UserRole>().unwrap(), UserRole::Seller);
        assert!("superuser".parse::<UserRole>().is_err());
    }
}
