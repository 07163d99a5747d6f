//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::Deserialize;

use crate::api::convert::{is_self_or_admin, user_record_id};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{OfferStatus, Order, OrderCreate, OrderStatus};
use crate::db::repository::make_record_id;
use crate::fees::{calculate_fees, round_money};
use crate::utils::validation::{MAX_ADDRESS_LEN, validate_amount, validate_required_text};
use crate::utils::{AppError, AppResult};

/// POST /api/orders - commit a purchase at an agreed price.
///
/// The price is never trusted as-is: it must match the listing price, or
/// the accepted offer when one is referenced. The availability flip and
/// the order insert run in one transaction (double-sale guard).
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    validate_amount(payload.final_price, "final_price")?;
    validate_required_text(&payload.delivery_address, "delivery_address", MAX_ADDRESS_LEN)?;

    let product = state
        .products
        .find_by_id(&payload.product_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", payload.product_id)))?;
    if user.id == product.seller.to_string() {
        return Err(AppError::validation("Cannot buy your own listing"));
    }

    let final_price = round_money(payload.final_price);
    let product_id = product
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Product record has no id"))?;

    // Cross-check the agreed price
    let offer_ref = match &payload.offer_id {
        Some(offer_id) => {
            let offer = state
                .offers
                .find_by_id(offer_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Offer {offer_id}")))?;
            if offer.status != OfferStatus::Accepted {
                return Err(AppError::conflict("Offer has not been accepted"));
            }
            if user.id != offer.buyer.to_string() {
                return Err(AppError::forbidden("Offer belongs to another buyer"));
            }
            if offer.product != product_id {
                return Err(AppError::validation("Offer is for a different product"));
            }
            if round_money(offer.amount) != final_price {
                return Err(AppError::validation(
                    "final_price does not match the accepted offer",
                ));
            }
            offer.id
        }
        None => {
            if round_money(product.price) != final_price {
                return Err(AppError::validation(
                    "final_price does not match the listing price",
                ));
            }
            None
        }
    };

    let fees = calculate_fees(final_price);
    let buyer = user_record_id(&user)?;
    let now = Utc::now();

    let order = Order {
        id: None,
        buyer,
        seller: product.seller.clone(),
        product: product_id.clone(),
        offer: offer_ref,
        final_price,
        buyer_fee: fees.buyer_fee,
        seller_fee: fees.seller_fee,
        platform_fee: fees.platform_fee,
        status: OrderStatus::Placed,
        delivery_address: payload.delivery_address,
        gateway_order_id: None,
        delivered_at: None,
        created_at: now,
        updated_at: now,
    };

    let created = state.orders.create_placed(product_id, order).await?;

    state
        .notifier()
        .notify_user(
            product.seller,
            "order_placed",
            "Your product was sold",
            &format!(
                "\"{}\" was ordered by {} for {}",
                product.title, user.username, created.final_price
            ),
        )
        .await;

    Ok(Json(created))
}

/// Load an order and check the caller is a party to it (or admin)
async fn load_for_party(
    state: &ServerState,
    user: &CurrentUser,
    id: &str,
) -> AppResult<Order> {
    let order = state
        .orders
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id}")))?;

    let is_party =
        user.id == order.buyer.to_string() || user.id == order.seller.to_string();
    if !is_party && !user.is_admin() {
        return Err(AppError::forbidden("Not a party to this order"));
    }
    Ok(order)
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = load_for_party(&state, &user, &id).await?;
    Ok(Json(order))
}

/// GET /api/orders/buyer/{id}
pub async fn list_by_buyer(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    if !is_self_or_admin(&user, &id) {
        return Err(AppError::forbidden("Can only view your own orders"));
    }
    let buyer = make_record_id("user", &id);
    let orders = state.orders.find_by_buyer(buyer).await?;
    Ok(Json(orders))
}

/// GET /api/orders/seller/{id}
pub async fn list_by_seller(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    if !is_self_or_admin(&user, &id) {
        return Err(AppError::forbidden("Can only view your own orders"));
    }
    let seller = make_record_id("user", &id);
    let orders = state.orders.find_by_seller(seller).await?;
    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// PUT /api/orders/{id}/status - delivery progression.
///
/// Forward-only with skips; `placed` and `confirmed` are unreachable by
/// hand (payment verification owns the confirmed transition). Guarded by
/// a conditional update on the expected prior status.
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .orders
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id}")))?;

    if user.id != order.seller.to_string() && !user.is_admin() {
        return Err(AppError::forbidden(
            "Only the seller or an admin can update delivery status",
        ));
    }

    let target = payload.status;
    if matches!(target, OrderStatus::Placed | OrderStatus::Confirmed) {
        return Err(AppError::validation(format!(
            "Cannot manually set status to {}",
            target.as_str()
        )));
    }
    if !order.status.can_progress_to(target) {
        return Err(AppError::conflict(format!(
            "Cannot move from {} to {}",
            order.status.as_str(),
            target.as_str()
        )));
    }

    let updated = state
        .orders
        .progress_status(&id, order.status, target)
        .await?;

    state
        .notifier()
        .notify_user(
            updated.buyer.clone(),
            "order_status",
            "Order update",
            &format!("Your order is now {}", updated.status.as_str()),
        )
        .await;

    Ok(Json(updated))
}
