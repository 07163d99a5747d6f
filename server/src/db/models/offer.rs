//! Offer Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Offer ID type
pub type OfferId = RecordId;

/// Offer lifecycle. Terminal once decided; a counter-proposal is a new
/// offer, not a mutation of this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

impl OfferStatus {
    pub fn is_decided(&self) -> bool {
        !matches!(self, OfferStatus::Pending)
    }
}

/// A buyer's proposed price for a product, decided unilaterally by the
/// seller. The seller reference is denormalized from the product at
/// creation time for query convenience.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OfferId>,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub buyer: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub seller: RecordId,
    pub amount: Decimal,
    pub message: Option<String>,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create offer payload
#[derive(Debug, Clone, Deserialize)]
pub struct OfferCreate {
    pub product_id: String,
    pub amount: Decimal,
    pub message: Option<String>,
}
