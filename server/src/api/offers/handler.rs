//! Offer API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::convert::{is_self_or_admin, user_record_id};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Offer, OfferCreate, OfferStatus};
use crate::db::repository::make_record_id;
use crate::utils::validation::{MAX_TEXT_LEN, validate_amount, validate_optional_text};
use crate::utils::{AppError, AppResult};

/// POST /api/offers - propose a price on a listable product
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OfferCreate>,
) -> AppResult<Json<Offer>> {
    validate_amount(payload.amount, "amount")?;
    validate_optional_text(&payload.message, "message", MAX_TEXT_LEN)?;

    let product = state
        .products
        .find_by_id(&payload.product_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", payload.product_id)))?;
    if !product.is_listable() {
        return Err(AppError::conflict("Product is not open for offers"));
    }
    if user.id == product.seller.to_string() {
        return Err(AppError::validation("Cannot make an offer on your own listing"));
    }

    let buyer = user_record_id(&user)?;
    let product_id = product
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Product record has no id"))?;
    let offer = state
        .offers
        .create(
            product_id,
            buyer,
            product.seller.clone(),
            payload.amount,
            payload.message,
        )
        .await?;

    state
        .notifier()
        .notify_user(
            product.seller,
            "offer_received",
            "New offer received",
            &format!(
                "{} offered {} for \"{}\"",
                user.username, offer.amount, product.title
            ),
        )
        .await;

    Ok(Json(offer))
}

/// GET /api/offers/product/{id} - offers on a product (public)
pub async fn list_by_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Offer>>> {
    let product = make_record_id("product", &id);
    let offers = state.offers.find_by_product(product).await?;
    Ok(Json(offers))
}

/// GET /api/offers/buyer/{id} - a buyer's offers (self or admin)
pub async fn list_by_buyer(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Offer>>> {
    if !is_self_or_admin(&user, &id) {
        return Err(AppError::forbidden("Can only view your own offers"));
    }
    let buyer = make_record_id("user", &id);
    let offers = state.offers.find_by_buyer(buyer).await?;
    Ok(Json(offers))
}

/// GET /api/offers/seller/{id} - offers received by a seller (self or admin)
pub async fn list_by_seller(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Offer>>> {
    if !is_self_or_admin(&user, &id) {
        return Err(AppError::forbidden("Can only view your own offers"));
    }
    let seller = make_record_id("user", &id);
    let offers = state.offers.find_by_seller(seller).await?;
    Ok(Json(offers))
}

/// PUT /api/offers/{id}/accept
pub async fn accept(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Offer>> {
    decide(state, user, id, OfferStatus::Accepted).await
}

/// PUT /api/offers/{id}/reject
pub async fn reject(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Offer>> {
    decide(state, user, id, OfferStatus::Rejected).await
}

/// Seller decision; the repository's conditional update makes the first
/// decision the only one.
async fn decide(
    state: ServerState,
    user: CurrentUser,
    id: String,
    verdict: OfferStatus,
) -> AppResult<Json<Offer>> {
    let offer = state
        .offers
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Offer {id}")))?;
    if user.id != offer.seller.to_string() {
        return Err(AppError::forbidden("Only the seller can decide this offer"));
    }

    let decided = state.offers.decide(&id, verdict).await?;

    let outcome = match verdict {
        OfferStatus::Accepted => "accepted",
        _ => "rejected",
    };
    let product_title = state
        .products
        .find_by_id(&decided.product.to_string())
        .await
        .ok()
        .flatten()
        .map(|p| p.title)
        .unwrap_or_else(|| "your offer's product".to_string());

    state
        .notifier()
        .notify_user(
            decided.buyer.clone(),
            "offer_decided",
            &format!("Offer {outcome}"),
            &format!(
                "Your offer of {} for \"{}\" was {}",
                decided.amount, product_title, outcome
            ),
        )
        .await;

    Ok(Json(decided))
}
