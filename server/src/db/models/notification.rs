//! Notification Model

use super::serde_helpers;
use super::user::UserRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Fire-and-forget inbox message.
///
/// Addressed either to a single user or to an entire role (admin
/// broadcast); exactly one of `user` / `audience_role` is set. Content is
/// write-once; only `is_read` mutates afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub user: Option<RecordId>,
    pub audience_role: Option<UserRole>,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
