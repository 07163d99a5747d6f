//! Notification API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::convert::user_record_id;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Notification;
use crate::utils::{AppError, AppResult};

/// GET /api/notifications - own inbox, direct plus role-addressed
pub async fn inbox(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Notification>>> {
    let user_id = user_record_id(&user)?;
    let notifications = state.notifications.inbox(user_id, user.role).await?;
    Ok(Json(notifications))
}

/// PUT /api/notifications/{id}/read - recipient only
pub async fn mark_read(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Notification>> {
    let notification = state
        .notifications
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Notification {id}")))?;

    let addressed_to_me = notification
        .user
        .as_ref()
        .map(|u| u.to_string() == user.id)
        .unwrap_or(false)
        || notification.audience_role == Some(user.role);
    if !addressed_to_me {
        return Err(AppError::forbidden("Not your notification"));
    }

    let updated = state.notifications.mark_read(&id).await?;
    Ok(Json(updated))
}
