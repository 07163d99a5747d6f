//! Rating API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use crate::api::convert::user_record_id;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Rating, RatingCreate};
use crate::db::repository::make_record_id;
use crate::utils::validation::{MAX_TEXT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

/// POST /api/ratings - one party rates the other after a transaction.
///
/// The rated account must be the counterparty of the order; the unique
/// index allows each party exactly one rating per order.
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<RatingCreate>,
) -> AppResult<Json<Rating>> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::validation("rating must be between 1 and 5"));
    }
    validate_optional_text(&payload.comment, "comment", MAX_TEXT_LEN)?;

    let order = state
        .orders
        .find_by_id(&payload.order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", payload.order_id)))?;

    let buyer = order.buyer.to_string();
    let seller = order.seller.to_string();
    let rated = make_record_id("user", &payload.rated_id);
    let rated_str = rated.to_string();

    // Rater and rated must be the two parties of the order
    let valid_pair = (user.id == buyer && rated_str == seller)
        || (user.id == seller && rated_str == buyer);
    if !valid_pair {
        return Err(AppError::forbidden(
            "Can only rate the other party of your own order",
        ));
    }

    let order_id = order
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Order record has no id"))?;
    let rating = Rating {
        id: None,
        order: order_id,
        rater: user_record_id(&user)?,
        rated,
        rating: payload.rating,
        comment: payload.comment,
        created_at: Utc::now(),
    };

    let created = state.ratings.create(rating).await?;
    Ok(Json(created))
}

/// GET /api/ratings/order/{id}
pub async fn list_by_order(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Rating>>> {
    let ratings = state
        .ratings
        .find_by_order(make_record_id("order", &id))
        .await?;
    Ok(Json(ratings))
}
