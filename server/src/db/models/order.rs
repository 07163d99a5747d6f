//! Order Model
//!
//! An order is a committed transaction at an agreed final price. It is
//! immutable except for its delivery status, which only moves forward.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order ID type
pub type OrderId = RecordId;

/// Delivery progress. Monotonic: no back-transitions, skips allowed
/// (couriers do not always report every intermediate state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Confirmed,
    PickedUp,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    /// Position in the delivery progression
    pub fn rank(&self) -> u8 {
        match self {
            OrderStatus::Placed => 0,
            OrderStatus::Confirmed => 1,
            OrderStatus::PickedUp => 2,
            OrderStatus::OutForDelivery => 3,
            OrderStatus::Delivered => 4,
        }
    }

    /// Whether `target` is a valid forward transition from `self`.
    /// Skipping intermediate states is allowed; going backwards or staying
    /// in place is not.
    pub fn can_progress_to(&self, target: OrderStatus) -> bool {
        target.rank() > self.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
        }
    }
}

/// Committed transaction with fee attribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    #[serde(with = "serde_helpers::record_id")]
    pub buyer: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub seller: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub offer: Option<RecordId>,
    pub final_price: Decimal,
    pub buyer_fee: Decimal,
    pub seller_fee: Decimal,
    pub platform_fee: Decimal,
    pub status: OrderStatus,
    pub delivery_address: String,
    /// Gateway order registered for this order when payment is initiated;
    /// a confirmation must reference it
    #[serde(default)]
    pub gateway_order_id: Option<String>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// What the buyer actually pays: agreed price plus the buyer-side fee
    pub fn buyer_total(&self) -> Decimal {
        self.final_price + self.buyer_fee
    }
}

/// Create order payload (buyer side)
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub product_id: String,
    pub offer_id: Option<String>,
    pub final_price: Decimal,
    pub delivery_address: String,
}

/// Consumed gateway payment confirmation.
///
/// One row per honored verification call; the unique index on `payment_id`
/// is the replay-protection set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub order: OrderId,
    pub gateway_order_id: String,
    pub payment_id: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(OrderStatus::Placed.can_progress_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_progress_to(OrderStatus::PickedUp));
        assert!(OrderStatus::PickedUp.can_progress_to(OrderStatus::OutForDelivery));
        assert!(OrderStatus::OutForDelivery.can_progress_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_skipping_intermediate_states_allowed() {
        assert!(OrderStatus::PickedUp.can_progress_to(OrderStatus::Delivered));
        assert!(OrderStatus::Confirmed.can_progress_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_backwards_and_self_transitions_rejected() {
        assert!(!OrderStatus::PickedUp.can_progress_to(OrderStatus::Placed));
        assert!(!OrderStatus::Delivered.can_progress_to(OrderStatus::OutForDelivery));
        assert!(!OrderStatus::Confirmed.can_progress_to(OrderStatus::Confirmed));
    }

    #[test]
    fn test_delivered_is_terminal() {
        for target in [
            OrderStatus::Placed,
            OrderStatus::Confirmed,
            OrderStatus::PickedUp,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ] {
            assert!(!OrderStatus::Delivered.can_progress_to(target));
        }
    }
}
