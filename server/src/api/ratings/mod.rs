//! Rating API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/ratings", rating_routes())
}

fn rating_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/order/{id}", get(handler::list_by_order))
}
