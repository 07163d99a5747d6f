//! Order API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/buyer/{id}", get(handler::list_by_buyer))
        .route("/seller/{id}", get(handler::list_by_seller))
        .route("/{id}/status", put(handler::update_status))
}
