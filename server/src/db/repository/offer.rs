//! Offer Repository

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::{Offer, OfferStatus};
use chrono::Utc;
use rust_decimal::Decimal;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const OFFER_TABLE: &str = "offer";

#[derive(Clone)]
pub struct OfferRepository {
    base: BaseRepository,
}

impl OfferRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(
        &self,
        product: RecordId,
        buyer: RecordId,
        seller: RecordId,
        amount: Decimal,
        message: Option<String>,
    ) -> RepoResult<Offer> {
        let now = Utc::now();
        let offer = Offer {
            id: None,
            product,
            buyer,
            seller,
            amount,
            message,
            status: OfferStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Offer> = self.base.db().create(OFFER_TABLE).content(offer).await?;

        created.ok_or_else(|| RepoError::Database("Failed to create offer".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Offer>> {
        let rid = make_record_id(OFFER_TABLE, id);
        let offer: Option<Offer> = self.base.db().select(rid).await?;
        Ok(offer)
    }

    pub async fn find_by_buyer(&self, buyer: RecordId) -> RepoResult<Vec<Offer>> {
        let offers: Vec<Offer> = self
            .base
            .db()
            .query("SELECT * FROM offer WHERE buyer = $buyer ORDER BY created_at DESC")
            .bind(("buyer", buyer.to_string()))
            .await?
            .take(0)?;
        Ok(offers)
    }

    pub async fn find_by_seller(&self, seller: RecordId) -> RepoResult<Vec<Offer>> {
        let offers: Vec<Offer> = self
            .base
            .db()
            .query("SELECT * FROM offer WHERE seller = $seller ORDER BY created_at DESC")
            .bind(("seller", seller.to_string()))
            .await?
            .take(0)?;
        Ok(offers)
    }

    pub async fn find_by_product(&self, product: RecordId) -> RepoResult<Vec<Offer>> {
        let offers: Vec<Offer> = self
            .base
            .db()
            .query("SELECT * FROM offer WHERE product = $product ORDER BY created_at DESC")
            .bind(("product", product.to_string()))
            .await?
            .take(0)?;
        Ok(offers)
    }

    /// Seller decision, first writer wins. The WHERE clause is the guard:
    /// once an offer leaves pending no later decision can overwrite it.
    pub async fn decide(&self, id: &str, verdict: OfferStatus) -> RepoResult<Offer> {
        if !verdict.is_decided() {
            return Err(RepoError::Validation(
                "Offer decision must be accepted or rejected".to_string(),
            ));
        }

        let rid = make_record_id(OFFER_TABLE, id);
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $offer SET status = $verdict, updated_at = $now \
                 WHERE status = 'pending' RETURN AFTER",
            )
            .bind(("offer", rid))
            .bind(("verdict", verdict))
            .bind(("now", Utc::now()))
            .await?;
        let offers: Vec<Offer> = result.take(0)?;

        match offers.into_iter().next() {
            Some(offer) => Ok(offer),
            None => match self.find_by_id(id).await? {
                Some(_) => Err(RepoError::Conflict(
                    "Offer has already been decided".to_string(),
                )),
                None => Err(RepoError::NotFound(format!("Offer {id} not found"))),
            },
        }
    }
}
