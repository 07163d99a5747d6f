//! Product Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Product ID type
pub type ProductId = RecordId;

/// Listing category (closed enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Electronics,
    Fashion,
    HomeGarden,
    Sports,
    Books,
    Other,
}

/// Admin-controlled moderation gate.
///
/// Availability is an independent axis: a product can be `approved` but
/// unavailable once sold or delisted. Only `approved` and available products
/// appear in the public catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Pending,
    Approved,
    Rejected,
}

/// Marketplace listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductId>,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(with = "serde_helpers::record_id")]
    pub seller: RecordId,
    pub status: ProductStatus,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Whether the product may appear in public browse/search results
    pub fn is_listable(&self) -> bool {
        self.status == ProductStatus::Approved && self.is_available
    }
}

/// Create product payload (seller submission, always starts pending)
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A proposed edit to a product, stored for the admin review loop.
///
/// Never mutates the live product directly; the owning seller consumes it
/// through an explicit resubmit action which re-queues the product for
/// review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductModification {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub product: ProductId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<Category>,
    pub images: Option<Vec<String>>,
    pub status: ProductStatus,
    pub requested_at: DateTime<Utc>,
}

/// Create payload for a product modification
#[derive(Debug, Clone, Deserialize)]
pub struct ProductModificationCreate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<Category>,
    pub images: Option<Vec<String>>,
}

impl ProductModificationCreate {
    /// A modification must propose at least one change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.images.is_none()
    }
}
