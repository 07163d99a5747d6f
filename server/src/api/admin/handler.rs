//! Admin API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{
    Order, OrderStatus, Product, ProductModification, ReturnRequest, ReturnStatus,
};
use crate::fees::to_minor_units;
use crate::security_log;
use crate::utils::validation::{MAX_TEXT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize, Default)]
pub struct ReasonBody {
    pub reason: Option<String>,
}

// =============================================================================
// Product moderation
// =============================================================================

/// GET /api/admin/products/pending - moderation queue
pub async fn pending_products(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.products.find_pending().await?;
    Ok(Json(products))
}

/// PUT /api/admin/products/{id}/approve
pub async fn approve_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state.products.review(&id, true).await?;

    state
        .notifier()
        .notify_user(
            product.seller.clone(),
            "product_approved",
            "Listing approved",
            &format!("\"{}\" is now live in the catalog", product.title),
        )
        .await;

    Ok(Json(product))
}

/// PUT /api/admin/products/{id}/reject
pub async fn reject_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<ReasonBody>,
) -> AppResult<Json<Product>> {
    validate_optional_text(&body.reason, "reason", MAX_TEXT_LEN)?;
    let product = state.products.review(&id, false).await?;

    let reason = body
        .reason
        .unwrap_or_else(|| "It does not meet the listing guidelines".to_string());
    state
        .notifier()
        .notify_user(
            product.seller.clone(),
            "product_rejected",
            "Listing rejected",
            &format!("\"{}\" was rejected: {}", product.title, reason),
        )
        .await;

    Ok(Json(product))
}

/// PUT /api/admin/products/{id}/request-changes - advisory only, the
/// product stays pending
pub async fn request_changes(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<ReasonBody>,
) -> AppResult<Json<Product>> {
    validate_optional_text(&body.reason, "reason", MAX_TEXT_LEN)?;

    let product = state
        .products
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;
    if product.status != crate::db::models::ProductStatus::Pending {
        return Err(AppError::conflict("Only pending listings can have changes requested"));
    }

    let reason = body
        .reason
        .unwrap_or_else(|| "Please review and update your listing details".to_string());
    state
        .notifier()
        .notify_user(
            product.seller.clone(),
            "changes_requested",
            "Changes requested",
            &format!("\"{}\": {}", product.title, reason),
        )
        .await;

    Ok(Json(product))
}

/// PUT /api/admin/products/{id}/delist - pull an approved listing from
/// the catalog without changing its moderation status
pub async fn delist_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<ReasonBody>,
) -> AppResult<Json<Product>> {
    validate_optional_text(&body.reason, "reason", MAX_TEXT_LEN)?;
    let product = state.products.delist(&id).await?;

    let reason = body
        .reason
        .unwrap_or_else(|| "It was removed from the catalog by a moderator".to_string());
    state
        .notifier()
        .notify_user(
            product.seller.clone(),
            "product_delisted",
            "Listing delisted",
            &format!("\"{}\" is no longer visible: {}", product.title, reason),
        )
        .await;

    Ok(Json(product))
}

/// DELETE /api/admin/products/{id} - hard delete, any status.
///
/// The seller notification is written before the row disappears; if the
/// delete then fails the seller got a spurious message, which is the
/// accepted trade-off for never losing the notification.
pub async fn delete_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let product = state
        .products
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;

    state
        .notifier()
        .notify_user(
            product.seller.clone(),
            "product_deleted",
            "Listing removed",
            &format!("\"{}\" was removed by a moderator", product.title),
        )
        .await;

    state.products.delete(&id).await?;
    security_log!("INFO", "product_deleted", product = id.clone());

    Ok(Json(serde_json::json!({ "deleted": id })))
}

/// GET /api/admin/modifications - pending edit requests across products
pub async fn pending_modifications(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<ProductModification>>> {
    let modifications = state.products.find_pending_modifications().await?;
    Ok(Json(modifications))
}

// =============================================================================
// Orders & returns
// =============================================================================

/// GET /api/admin/orders
pub async fn all_orders(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.find_all().await?;
    Ok(Json(orders))
}

/// GET /api/admin/returns
pub async fn all_returns(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<ReturnRequest>>> {
    let returns = state.returns.find_all().await?;
    Ok(Json(returns))
}

/// PUT /api/admin/returns/{id}/approve
pub async fn approve_return(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ReturnRequest>> {
    decide_return(state, id, true).await
}

/// PUT /api/admin/returns/{id}/reject
pub async fn reject_return(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ReturnRequest>> {
    decide_return(state, id, false).await
}

async fn decide_return(
    state: ServerState,
    id: String,
    approve: bool,
) -> AppResult<Json<ReturnRequest>> {
    let decided = state.returns.decide(&id, approve).await?;

    // Tell the buyer; their id lives on the order
    if let Ok(Some(order)) = state.orders.find_by_id(&decided.order.to_string()).await {
        let outcome = if approve { "approved" } else { "rejected" };
        state
            .notifier()
            .notify_user(
                order.buyer,
                "return_decided",
                &format!("Return {outcome}"),
                &format!("Your return request was {outcome}"),
            )
            .await;
    }

    Ok(Json(decided))
}

/// POST /api/admin/returns/{id}/refund - issue the gateway refund for an
/// approved return and mark it processed.
///
/// The refund targets the payment that confirmed the order, looked up
/// from the consumed receipt. Gateway failure leaves the return approved
/// so the call can be retried.
pub async fn refund_return(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ReturnRequest>> {
    let request = state
        .returns
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Return {id}")))?;
    if request.status != ReturnStatus::Approved {
        return Err(AppError::conflict("Return is not approved for refund"));
    }

    let receipt = state
        .orders
        .find_receipt(request.order.clone())
        .await?
        .ok_or_else(|| AppError::conflict("Order has no recorded payment to refund"))?;

    let amount_minor = to_minor_units(request.refund_amount)
        .ok_or_else(|| AppError::validation("Refund amount out of range"))?;
    let refund = state
        .gateway()
        .refund(&receipt.payment_id, amount_minor)
        .await?;

    let processed = state.returns.mark_processed(&id, &refund.id).await?;
    security_log!(
        "INFO",
        "refund_processed",
        return_id = id.clone(),
        refund_id = refund.id.clone()
    );

    if let Ok(Some(order)) = state.orders.find_by_id(&processed.order.to_string()).await {
        state
            .notifier()
            .notify_user(
                order.buyer,
                "refund_processed",
                "Refund processed",
                &format!("{} has been refunded to your payment method", processed.refund_amount),
            )
            .await;
    }

    Ok(Json(processed))
}

// =============================================================================
// Analytics
// =============================================================================

#[derive(Debug, Serialize)]
pub struct Analytics {
    pub total_orders: usize,
    pub paid_orders: usize,
    pub delivered_orders: usize,
    /// Summed platform fees over paid orders
    pub platform_revenue: Decimal,
}

/// GET /api/admin/analytics
pub async fn analytics(State(state): State<ServerState>) -> AppResult<Json<Analytics>> {
    let orders = state.orders.find_all().await?;

    let mut paid_orders = 0;
    let mut delivered_orders = 0;
    let mut platform_revenue = Decimal::ZERO;
    for order in &orders {
        // Fees are earned once payment is confirmed
        if order.status != OrderStatus::Placed {
            paid_orders += 1;
            platform_revenue += order.platform_fee;
        }
        if order.status == OrderStatus::Delivered {
            delivered_orders += 1;
        }
    }

    Ok(Json(Analytics {
        total_orders: orders.len(),
        paid_orders,
        delivered_orders,
        platform_revenue,
    }))
}
