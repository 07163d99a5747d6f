//! Shared handler helpers

use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::utils::{AppError, AppResult};

/// The authenticated user's id as a RecordId
pub fn user_record_id(user: &CurrentUser) -> AppResult<RecordId> {
    user.id
        .parse::<RecordId>()
        .map_err(|_| AppError::invalid_token("Malformed subject in token"))
}

/// True when `user` is the account identified by `id` (either "table:id"
/// or bare key form) or an admin.
pub fn is_self_or_admin(user: &CurrentUser, id: &str) -> bool {
    if user.is_admin() {
        return true;
    }
    user.id == id || user.id == format!("user:{id}")
}
