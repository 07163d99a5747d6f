//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`auth`] - registration, login, OTP verification
//! - [`products`] - catalog and seller listings
//! - [`offers`] - price negotiation
//! - [`orders`] - order lifecycle
//! - [`payments`] - gateway order creation and verification
//! - [`returns`] - return requests
//! - [`notifications`] - inbox
//! - [`ratings`] - post-transaction feedback
//! - [`admin`] - moderation, return decisions, analytics

pub mod convert;

pub mod admin;
pub mod auth;
pub mod health;
pub mod notifications;
pub mod offers;
pub mod orders;
pub mod payments;
pub mod products;
pub mod ratings;
pub mod returns;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::{rate_limit, require_auth};
use crate::core::ServerState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(products::router())
        .merge(offers::router())
        .merge(orders::router())
        .merge(payments::router())
        .merge(returns::router())
        .merge(notifications::router())
        .merge(ratings::router())
        .merge(admin::router())
}

/// Build the fully configured application with middleware and state
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // CORS - handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - gzip responses
        .layer(CompressionLayer::new())
        // Trace - request logging at INFO level
        .layer(TraceLayer::new_for_http())
        // Request ID - unique ID per request, propagated to the response
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // JWT authentication - injects CurrentUser for protected routes
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        // Rate limiting - outermost, runs before authentication
        .layer(axum_middleware::from_fn_with_state(state.clone(), rate_limit))
        .with_state(state)
}
