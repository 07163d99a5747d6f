//! Product API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", product_routes())
}

fn product_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/seller/{seller_id}", get(handler::list_by_seller))
        .route("/{id}/modifications", post(handler::create_modification))
        .route("/{id}/resubmit", post(handler::resubmit))
}
