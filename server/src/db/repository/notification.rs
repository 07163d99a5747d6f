//! Notification Repository

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::{Notification, UserRole};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const NOTIFICATION_TABLE: &str = "notification";

#[derive(Clone)]
pub struct NotificationRepository {
    base: BaseRepository,
}

impl NotificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, notification: Notification) -> RepoResult<Notification> {
        let created: Option<Notification> = self
            .base
            .db()
            .create(NOTIFICATION_TABLE)
            .content(notification)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create notification".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Notification>> {
        let rid = make_record_id(NOTIFICATION_TABLE, id);
        let notification: Option<Notification> = self.base.db().select(rid).await?;
        Ok(notification)
    }

    /// A user's inbox: messages addressed to them plus broadcasts to their
    /// role, newest first.
    pub async fn inbox(&self, user: RecordId, role: UserRole) -> RepoResult<Vec<Notification>> {
        let notifications: Vec<Notification> = self
            .base
            .db()
            .query(
                "SELECT * FROM notification \
                 WHERE user = $user OR audience_role = $role \
                 ORDER BY created_at DESC",
            )
            .bind(("user", user.to_string()))
            .bind(("role", role))
            .await?
            .take(0)?;
        Ok(notifications)
    }

    pub async fn mark_read(&self, id: &str) -> RepoResult<Notification> {
        let rid = make_record_id(NOTIFICATION_TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $notification SET is_read = true RETURN AFTER")
            .bind(("notification", rid))
            .await?;
        let notifications: Vec<Notification> = result.take(0)?;
        notifications
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Notification {id} not found")))
    }
}
