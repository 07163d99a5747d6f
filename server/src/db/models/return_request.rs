//! Return Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Return lifecycle, independent of the order's delivery status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnStatus {
    Requested,
    Approved,
    Rejected,
    Processed,
}

/// How the return was initiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnType {
    /// Refused at the doorstep, at delivery time
    OnSpot,
    /// Requested within the post-delivery return window
    WithinDays,
}

/// Return request tied to exactly one order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRequest {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    pub reason: String,
    pub return_type: ReturnType,
    pub status: ReturnStatus,
    /// Amount to refund: what the buyer actually paid (price + buyer fee)
    pub refund_amount: Decimal,
    /// Gateway refund id, recorded when the return is processed
    pub refund_id: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// Create return payload
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnCreate {
    pub order_id: String,
    pub reason: String,
    pub return_type: ReturnType,
}
