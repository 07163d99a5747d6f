//! Return API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{Duration, Utc};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{OrderStatus, ReturnCreate, ReturnRequest, ReturnStatus, ReturnType};
use crate::db::repository::make_record_id;
use crate::utils::validation::{MAX_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// POST /api/returns - buyer files a return for a delivered order.
///
/// Both return types require the order to be delivered; `within_days`
/// additionally enforces the configured window from `delivered_at`.
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ReturnCreate>,
) -> AppResult<Json<ReturnRequest>> {
    validate_required_text(&payload.reason, "reason", MAX_TEXT_LEN)?;

    let order = state
        .orders
        .find_by_id(&payload.order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", payload.order_id)))?;

    if user.id != order.buyer.to_string() {
        return Err(AppError::forbidden("Only the buyer can request a return"));
    }
    if order.status != OrderStatus::Delivered {
        return Err(AppError::conflict("Order has not been delivered"));
    }

    if payload.return_type == ReturnType::WithinDays {
        let delivered_at = order
            .delivered_at
            .ok_or_else(|| AppError::internal("Delivered order missing delivered_at"))?;
        let window = Duration::days(state.config().return_window_days);
        if Utc::now() > delivered_at + window {
            return Err(AppError::conflict(format!(
                "Return window of {} days has passed",
                state.config().return_window_days
            )));
        }
    }

    let order_id = order
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Order record has no id"))?;
    let request = ReturnRequest {
        id: None,
        order: order_id,
        reason: payload.reason,
        return_type: payload.return_type,
        status: ReturnStatus::Requested,
        // Refund what the buyer actually paid, price plus buyer-side fee
        refund_amount: order.buyer_total(),
        refund_id: None,
        requested_at: Utc::now(),
        processed_at: None,
    };

    let created = state.returns.create(request).await?;

    state
        .notifier()
        .notify_admins(
            "return_requested",
            "Return requested",
            &format!(
                "{} requested a return on order {} ({})",
                user.username, payload.order_id, created.reason
            ),
        )
        .await;

    Ok(Json(created))
}

/// GET /api/returns/order/{order_id} - parties to the order, or admin
pub async fn get_by_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<String>,
) -> AppResult<Json<ReturnRequest>> {
    let order = state
        .orders
        .find_by_id(&order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))?;

    let is_party =
        user.id == order.buyer.to_string() || user.id == order.seller.to_string();
    if !is_party && !user.is_admin() {
        return Err(AppError::forbidden("Not a party to this order"));
    }

    let request = state
        .returns
        .find_by_order(make_record_id("order", &order_id))
        .await?
        .ok_or_else(|| AppError::not_found(format!("Return for order {order_id}")))?;
    Ok(Json(request))
}
