//! Notification fan-out
//!
//! Best-effort delivery: workflow handlers call the notifier after their
//! own write has committed, and a failed insert is logged and swallowed
//! so it can never fail the triggering request.

use surrealdb::RecordId;

use crate::db::models::{Notification, UserRole};
use crate::db::repository::NotificationRepository;
use chrono::Utc;

#[derive(Clone)]
pub struct Notifier {
    repo: NotificationRepository,
}

impl Notifier {
    pub fn new(repo: NotificationRepository) -> Self {
        Self { repo }
    }

    /// Deliver to a single user's inbox
    pub async fn notify_user(&self, user: RecordId, kind: &str, title: &str, message: &str) {
        let notification = Notification {
            id: None,
            user: Some(user.clone()),
            audience_role: None,
            title: title.to_string(),
            message: message.to_string(),
            kind: kind.to_string(),
            is_read: false,
            created_at: Utc::now(),
        };

        if let Err(e) = self.repo.create(notification).await {
            tracing::warn!(
                user = %user,
                kind = %kind,
                error = %e,
                "Failed to deliver notification"
            );
        }
    }

    /// Broadcast to every admin (single role-addressed row, not a fan-out
    /// per account)
    pub async fn notify_admins(&self, kind: &str, title: &str, message: &str) {
        let notification = Notification {
            id: None,
            user: None,
            audience_role: Some(UserRole::Admin),
            title: title.to_string(),
            message: message.to_string(),
            kind: kind.to_string(),
            is_read: false,
            created_at: Utc::now(),
        };

        if let Err(e) = self.repo.create(notification).await {
            tracing::warn!(kind = %kind, error = %e, "Failed to deliver admin notification");
        }
    }
}
