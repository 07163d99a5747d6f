//! Authentication middleware
//!
//! Axum middleware for JWT authentication and role checks.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Whether a request may pass without a token.
///
/// Public surface: registration/login/OTP, the browse catalog (GET only)
/// and non-API paths such as the health probe.
fn is_public(method: &http::Method, path: &str) -> bool {
    if !path.starts_with("/api/") {
        return true;
    }
    if path.starts_with("/api/auth/") {
        return true;
    }
    if method != http::Method::GET {
        return false;
    }
    if path == "/api/health" {
        return true;
    }
    // Catalog browsing is anonymous; the seller dashboard under the same
    // prefix is not
    if path == "/api/products"
        || (path.starts_with("/api/products/") && !path.starts_with("/api/products/seller/"))
    {
        return true;
    }
    path.starts_with("/api/offers/product/")
}

/// Authentication middleware.
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`,
/// then injects [`CurrentUser`] into request extensions.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight skips auth
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if is_public(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match state.jwt_service().validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims)
                .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Admin middleware, applied to `/api/admin` routes
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id.clone(),
            username = user.username.clone()
        );
        return Err(AppError::forbidden("Admin role required"));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        let get = http::Method::GET;
        let post = http::Method::POST;

        assert!(is_public(&post, "/api/auth/login"));
        assert!(is_public(&post, "/api/auth/verify-otp"));
        assert!(is_public(&get, "/api/products"));
        assert!(is_public(&get, "/api/products/product:abc"));
        assert!(is_public(&get, "/api/offers/product/product:abc"));
        assert!(is_public(&get, "/api/health"));

        assert!(!is_public(&get, "/api/products/seller/user:abc"));
        assert!(!is_public(&post, "/api/products"));
        assert!(!is_public(&get, "/api/orders/order:1"));
        assert!(!is_public(&get, "/api/notifications"));
        assert!(!is_public(&post, "/api/offers"));
    }
}
