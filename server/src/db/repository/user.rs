//! User Repository

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::{User, UserCreate};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Register a new account. Mobile and username uniqueness is enforced
    /// by the unique indexes; a violation maps to [`RepoError::Duplicate`].
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;

        let user = User {
            id: None,
            username: data.username,
            mobile: data.mobile,
            email: data.email,
            hash_pass,
            role: data.role,
            is_verified: false,
            created_at: Utc::now(),
        };

        let created: Option<User> = self.base.db().create(USER_TABLE).content(user).await?;

        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let rid = make_record_id(USER_TABLE, id);
        let user: Option<User> = self.base.db().select(rid).await?;
        Ok(user)
    }

    pub async fn find_by_mobile(&self, mobile: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE mobile = $mobile")
            .bind(("mobile", mobile.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username")
            .bind(("username", username.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    /// Mark the account mobile-verified after OTP confirmation
    pub async fn set_verified(&self, id: &str) -> RepoResult<User> {
        let rid = make_record_id(USER_TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $user SET is_verified = true RETURN AFTER")
            .bind(("user", rid))
            .await?;
        let users: Vec<User> = result.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
    }
}
