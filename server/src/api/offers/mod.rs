//! Offer API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/offers", offer_routes())
}

fn offer_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/product/{id}", get(handler::list_by_product))
        .route("/buyer/{id}", get(handler::list_by_buyer))
        .route("/seller/{id}", get(handler::list_by_seller))
        .route("/{id}/accept", put(handler::accept))
        .route("/{id}/reject", put(handler::reject))
}
