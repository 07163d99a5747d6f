//! Notification API module

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", notification_routes())
}

fn notification_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::inbox))
        .route("/{id}/read", put(handler::mark_read))
}
