//! Return API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/returns", return_routes())
}

fn return_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/order/{order_id}", get(handler::get_by_order))
}
