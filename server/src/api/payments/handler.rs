//! Payment API Handlers
//!
//! Two steps: register a gateway order for the buyer total, then verify
//! the signed confirmation the client brings back. The amount is always
//! derived server-side; nothing from the client is trusted except the
//! signature, which is recomputed locally.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus};
use crate::fees::to_minor_units;
use crate::payment::verify_signature;
use crate::security_log;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct CreateGatewayOrderRequest {
    pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreateGatewayOrderResponse {
    pub gateway_order_id: String,
    /// Amount in paise, as registered with the gateway
    pub amount: i64,
    pub currency: String,
    /// Public key id the client SDK needs to open the checkout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
}

/// POST /api/payments/create-order - register the buyer total with the
/// gateway for a placed order
pub async fn create_gateway_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateGatewayOrderRequest>,
) -> AppResult<Json<CreateGatewayOrderResponse>> {
    let order = state
        .orders
        .find_by_id(&payload.order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", payload.order_id)))?;

    if user.id != order.buyer.to_string() {
        return Err(AppError::forbidden("Only the buyer can pay for this order"));
    }
    if order.status != OrderStatus::Placed {
        return Err(AppError::conflict("Order is not awaiting payment"));
    }

    let amount_minor = to_minor_units(order.buyer_total())
        .ok_or_else(|| AppError::validation("Order amount out of range"))?;

    let order_id = order
        .id
        .as_ref()
        .ok_or_else(|| AppError::internal("Order record has no id"))?
        .to_string();
    let gateway_order = state.gateway().create_order(amount_minor, &order_id).await?;

    // Remember which gateway order may confirm this order; verification
    // rejects a signed confirmation for any other one
    state
        .orders
        .set_gateway_order(&order_id, &gateway_order.id)
        .await?;

    Ok(Json(CreateGatewayOrderResponse {
        gateway_order_id: gateway_order.id,
        amount: gateway_order.amount,
        currency: gateway_order.currency,
        key_id: state.config().razorpay_key_id.clone(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub order_id: String,
    pub gateway_order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// POST /api/payments/verify - check the gateway signature and confirm
/// the order.
///
/// A mismatching signature mutates nothing. On a match, the receipt
/// insert and the placed -> confirmed transition commit in one
/// transaction; a replayed payment id rolls the whole thing back.
pub async fn verify(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<VerifyPaymentRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .orders
        .find_by_id(&payload.order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", payload.order_id)))?;

    if user.id != order.buyer.to_string() {
        return Err(AppError::forbidden("Only the buyer can verify this payment"));
    }
    // A valid signature for some other (cheaper) gateway order must not
    // confirm this one
    if order.gateway_order_id.as_deref() != Some(payload.gateway_order_id.as_str()) {
        return Err(AppError::conflict(
            "Payment is for a different gateway order",
        ));
    }

    let genuine = verify_signature(
        state.config().gateway_secret(),
        &payload.gateway_order_id,
        &payload.payment_id,
        &payload.signature,
    );
    if !genuine {
        security_log!(
            "WARN",
            "payment_signature_mismatch",
            order = payload.order_id.clone(),
            payment_id = payload.payment_id.clone()
        );
        return Err(AppError::conflict("Payment signature verification failed"));
    }

    let order_id = order
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Order record has no id"))?;
    let confirmed = state
        .orders
        .confirm_payment(order_id, &payload.gateway_order_id, &payload.payment_id)
        .await?;

    state
        .notifier()
        .notify_user(
            confirmed.seller.clone(),
            "payment_received",
            "Payment received",
            &format!(
                "Payment of {} confirmed; please arrange pickup",
                confirmed.buyer_total()
            ),
        )
        .await;

    Ok(Json(confirmed))
}
