//! Admin API module
//!
//! Moderation queue, return decisions, refunds and analytics. The whole
//! subtree sits behind the admin role check.

mod handler;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", admin_routes())
}

fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/products/pending", get(handler::pending_products))
        .route("/products/{id}/approve", put(handler::approve_product))
        .route("/products/{id}/reject", put(handler::reject_product))
        .route("/products/{id}/request-changes", put(handler::request_changes))
        .route("/products/{id}/delist", put(handler::delist_product))
        .route("/products/{id}", delete(handler::delete_product))
        .route("/modifications", get(handler::pending_modifications))
        .route("/orders", get(handler::all_orders))
        .route("/returns", get(handler::all_returns))
        .route("/returns/{id}/approve", put(handler::approve_return))
        .route("/returns/{id}/reject", put(handler::reject_return))
        .route("/returns/{id}/refund", post(handler::refund_return))
        .route("/analytics", get(handler::analytics))
        .route_layer(axum_middleware::from_fn(require_admin))
}
