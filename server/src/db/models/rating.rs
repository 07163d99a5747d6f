//! Rating Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Post-transaction feedback from one party about the other.
/// At most one rating per (order, rater).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub rater: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub rated: RecordId,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create rating payload
#[derive(Debug, Clone, Deserialize)]
pub struct RatingCreate {
    pub order_id: String,
    pub rated_id: String,
    pub rating: i32,
    pub comment: Option<String>,
}
