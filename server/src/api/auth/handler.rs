//! Auth API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{User, UserCreate, UserPublic, UserRole};
use crate::db::repository::RepoError;
use crate::security_log;
use crate::utils::validation::{
    MAX_SHORT_TEXT_LEN, MAX_TITLE_LEN, validate_mobile, validate_password_strength,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserPublic,
}

fn auth_response(state: &ServerState, user: &User) -> AppResult<AuthResponse> {
    let user_id = user
        .id
        .as_ref()
        .ok_or_else(|| AppError::internal("User record has no id"))?
        .to_string();

    let token = state
        .jwt_service()
        .generate_token(&user_id, &user.username, user.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    Ok(AuthResponse {
        token,
        user: UserPublic::from(user),
    })
}

/// POST /api/auth/register - create an account, returns a token
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<AuthResponse>> {
    validate_required_text(&payload.username, "username", MAX_TITLE_LEN)?;
    validate_mobile(&payload.mobile)?;
    validate_password_strength(&payload.password)?;
    if payload.role == UserRole::Admin {
        return Err(AppError::validation("Cannot self-register as admin"));
    }

    let user = state.users.create(payload).await.map_err(|e| match e {
        RepoError::Duplicate(_) => {
            AppError::conflict("Mobile number or username already registered")
        }
        other => other.into(),
    })?;

    security_log!(
        "INFO",
        "user_registered",
        username = user.username.clone(),
        role = user.role.to_string()
    );

    Ok(Json(auth_response(&state, &user)?))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub mobile: String,
    pub password: String,
}

/// POST /api/auth/login - mobile + password
///
/// Unknown mobile numbers still pay for a hash computation, keeping the
/// response time close to the real-verification path.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    validate_mobile(&payload.mobile)?;

    let user = match state.users.find_by_mobile(&payload.mobile).await? {
        Some(user) => user,
        None => {
            let _ = User::hash_password(&payload.password);
            security_log!("WARN", "login_unknown_mobile", mobile = payload.mobile.clone());
            return Err(AppError::invalid_credentials());
        }
    };

    let verified = user
        .verify_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !verified {
        security_log!("WARN", "login_failed", username = user.username.clone());
        return Err(AppError::invalid_credentials());
    }

    security_log!("INFO", "login_ok", username = user.username.clone());
    Ok(Json(auth_response(&state, &user)?))
}

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub mobile: String,
}

#[derive(Debug, Serialize)]
pub struct SendOtpResponse {
    pub message: String,
    /// Echoed only outside production (no SMS integration)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// POST /api/auth/send-otp - issue a verification code for a mobile number
pub async fn send_otp(
    State(state): State<ServerState>,
    Json(payload): Json<SendOtpRequest>,
) -> AppResult<Json<SendOtpResponse>> {
    validate_mobile(&payload.mobile)?;

    state
        .users
        .find_by_mobile(&payload.mobile)
        .await?
        .ok_or_else(|| AppError::not_found("Account for this mobile number"))?;

    let code = state.otp_cache().issue(&payload.mobile);

    Ok(Json(SendOtpResponse {
        message: "OTP sent".to_string(),
        code: (!state.config().is_production()).then_some(code),
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub mobile: String,
    pub code: String,
}

/// POST /api/auth/verify-otp - consume the code, mark the account verified
pub async fn verify_otp(
    State(state): State<ServerState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> AppResult<Json<UserPublic>> {
    validate_mobile(&payload.mobile)?;
    validate_required_text(&payload.code, "code", MAX_SHORT_TEXT_LEN)?;

    if !state.otp_cache().verify(&payload.mobile, &payload.code) {
        security_log!("WARN", "otp_verify_failed", mobile = payload.mobile.clone());
        return Err(AppError::validation("Invalid or expired OTP"));
    }

    let user = state
        .users
        .find_by_mobile(&payload.mobile)
        .await?
        .ok_or_else(|| AppError::not_found("Account for this mobile number"))?;
    let user_id = user
        .id
        .as_ref()
        .ok_or_else(|| AppError::internal("User record has no id"))?
        .to_string();

    let verified = state.users.set_verified(&user_id).await?;
    Ok(Json(UserPublic::from(&verified)))
}
