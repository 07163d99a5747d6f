//! Rating Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Rating;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const RATING_TABLE: &str = "rating";

#[derive(Clone)]
pub struct RatingRepository {
    base: BaseRepository,
}

impl RatingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// One rating per (order, rater); the unique index rejects a second
    pub async fn create(&self, rating: Rating) -> RepoResult<Rating> {
        let created: Option<Rating> = self
            .base
            .db()
            .create(RATING_TABLE)
            .content(rating)
            .await
            .map_err(|e| {
                let mapped: RepoError = e.into();
                match mapped {
                    RepoError::Duplicate(_) => RepoError::Duplicate(
                        "You have already rated this order".to_string(),
                    ),
                    other => other,
                }
            })?;

        created.ok_or_else(|| RepoError::Database("Failed to create rating".to_string()))
    }

    pub async fn find_by_order(&self, order: RecordId) -> RepoResult<Vec<Rating>> {
        let ratings: Vec<Rating> = self
            .base
            .db()
            .query("SELECT * FROM rating WHERE order = $order ORDER BY created_at DESC")
            .bind(("order", order.to_string()))
            .await?
            .take(0)?;
        Ok(ratings)
    }
}
