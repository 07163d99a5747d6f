//! Payment API module

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payments", payment_routes())
}

fn payment_routes() -> Router<ServerState> {
    Router::new()
        .route("/create-order", post(handler::create_gateway_order))
        .route("/verify", post(handler::verify))
}
