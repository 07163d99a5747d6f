//! Order Repository
//!
//! Order creation and payment confirmation are the two money-critical
//! writes, so both run as single SurrealDB transactions:
//!
//! - placing an order flips the product's availability and creates the
//!   order atomically (two buyers cannot both buy the last unit);
//! - confirming a payment inserts a receipt (unique on payment_id, so a
//!   replayed confirmation dies on the index) and advances the order
//!   placed -> confirmed in the same transaction.

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::{Order, OrderStatus, PaymentReceipt};
use chrono::Utc;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

/// Serialize a model for CONTENT binding, dropping the unset id so the
/// database generates one.
fn content_value<T: serde::Serialize>(model: &T) -> RepoResult<serde_json::Value> {
    let mut value = serde_json::to_value(model)
        .map_err(|e| RepoError::Database(format!("Serialization failed: {e}")))?;
    if let Some(object) = value.as_object_mut() {
        object.remove("id");
    }
    Ok(value)
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Place an order, consuming the product's availability.
    ///
    /// The availability flip is the sale guard: the conditional UPDATE
    /// succeeds for exactly one concurrent buyer; everyone else gets a
    /// conflict and no order row.
    pub async fn create_placed(&self, product: RecordId, order: Order) -> RepoResult<Order> {
        let content = content_value(&order)?;

        let result = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 LET $sold = UPDATE $product SET is_available = false, updated_at = $now \
                     WHERE status = 'approved' AND is_available = true RETURN AFTER;
                 IF array::len($sold) == 0 {
                     THROW 'product_unavailable';
                 };
                 LET $created = CREATE order CONTENT $order;
                 RETURN $created[0];
                 COMMIT TRANSACTION;",
            )
            .bind(("product", product))
            .bind(("order", content))
            .bind(("now", Utc::now()))
            .await;

        let mut response = match result {
            Ok(response) => response,
            Err(e) => return Err(map_order_error(e)),
        };

        let created: Option<Order> = match response.take(0) {
            Ok(created) => created,
            Err(e) => return Err(map_order_error(e)),
        };
        created.ok_or_else(|| RepoError::Database("Order creation returned no row".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = make_record_id(ORDER_TABLE, id);
        let order: Option<Order> = self.base.db().select(rid).await?;
        Ok(order)
    }

    pub async fn find_by_buyer(&self, buyer: RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE buyer = $buyer ORDER BY created_at DESC")
            .bind(("buyer", buyer.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_by_seller(&self, seller: RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE seller = $seller ORDER BY created_at DESC")
            .bind(("seller", seller.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Every order, newest first (admin overview and analytics)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Advance the delivery status, guarded on the expected current status.
    /// Reaching `delivered` also stamps `delivered_at`, which anchors the
    /// return window.
    pub async fn progress_status(
        &self,
        id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> RepoResult<Order> {
        let rid = make_record_id(ORDER_TABLE, id);
        let query_str = if to == OrderStatus::Delivered {
            "UPDATE $order SET status = $to, delivered_at = $now, updated_at = $now \
             WHERE status = $from RETURN AFTER"
        } else {
            "UPDATE $order SET status = $to, updated_at = $now \
             WHERE status = $from RETURN AFTER"
        };

        let mut result = self
            .base
            .db()
            .query(query_str)
            .bind(("order", rid))
            .bind(("from", from))
            .bind(("to", to))
            .bind(("now", Utc::now()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;

        match orders.into_iter().next() {
            Some(order) => Ok(order),
            None => match self.find_by_id(id).await? {
                Some(current) => Err(RepoError::Conflict(format!(
                    "Order is {}, expected {}",
                    current.status.as_str(),
                    from.as_str()
                ))),
                None => Err(RepoError::NotFound(format!("Order {id} not found"))),
            },
        }
    }

    /// Record the gateway order registered for payment. Only a placed
    /// order can have one; re-registering replaces it.
    pub async fn set_gateway_order(
        &self,
        id: &str,
        gateway_order_id: &str,
    ) -> RepoResult<Order> {
        let rid = make_record_id(ORDER_TABLE, id);
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $order SET gateway_order_id = $gwo, updated_at = $now \
                 WHERE status = 'placed' RETURN AFTER",
            )
            .bind(("order", rid))
            .bind(("gwo", gateway_order_id.to_string()))
            .bind(("now", Utc::now()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;

        match orders.into_iter().next() {
            Some(order) => Ok(order),
            None => match self.find_by_id(id).await? {
                Some(_) => Err(RepoError::Conflict(
                    "Order is not awaiting payment".to_string(),
                )),
                None => Err(RepoError::NotFound(format!("Order {id} not found"))),
            },
        }
    }

    /// Honor a verified gateway payment exactly once.
    ///
    /// The receipt insert and the placed -> confirmed transition commit
    /// together. A replayed payment_id violates the receipt unique index
    /// and rolls the whole transaction back; a confirmation for a gateway
    /// order other than the one registered on the order never matches the
    /// guarded update.
    pub async fn confirm_payment(
        &self,
        order: RecordId,
        gateway_order_id: &str,
        payment_id: &str,
    ) -> RepoResult<Order> {
        let receipt = PaymentReceipt {
            id: None,
            order: order.clone(),
            gateway_order_id: gateway_order_id.to_string(),
            payment_id: payment_id.to_string(),
            created_at: Utc::now(),
        };
        let content = content_value(&receipt)?;

        let result = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 CREATE payment_receipt CONTENT $receipt;
                 LET $confirmed = UPDATE $order SET status = 'confirmed', updated_at = $now \
                     WHERE status = 'placed' AND gateway_order_id = $gwo RETURN AFTER;
                 IF array::len($confirmed) == 0 {
                     THROW 'order_not_payable';
                 };
                 RETURN $confirmed[0];
                 COMMIT TRANSACTION;",
            )
            .bind(("receipt", content))
            .bind(("order", order))
            .bind(("gwo", gateway_order_id.to_string()))
            .bind(("now", Utc::now()))
            .await;

        let mut response = match result {
            Ok(response) => response,
            Err(e) => return Err(map_payment_error(e)),
        };

        // The explicit RETURN collapses the transaction to a single result;
        // an index violation or THROW surfaces here as an error.
        let confirmed: Option<Order> = match response.take(0) {
            Ok(confirmed) => confirmed,
            Err(e) => return Err(map_payment_error(e)),
        };
        confirmed
            .ok_or_else(|| RepoError::Database("Payment confirmation returned no row".to_string()))
    }

    /// Receipt for a paid order, if any (needed to issue a refund)
    pub async fn find_receipt(&self, order: RecordId) -> RepoResult<Option<PaymentReceipt>> {
        let receipts: Vec<PaymentReceipt> = self
            .base
            .db()
            .query("SELECT * FROM payment_receipt WHERE order = $order")
            .bind(("order", order.to_string()))
            .await?
            .take(0)?;
        Ok(receipts.into_iter().next())
    }
}

fn map_order_error(err: surrealdb::Error) -> RepoError {
    let msg = err.to_string();
    if msg.contains("product_unavailable") {
        RepoError::Conflict("Product is no longer available".to_string())
    } else {
        err.into()
    }
}

fn map_payment_error(err: surrealdb::Error) -> RepoError {
    let msg = err.to_string();
    if msg.contains("already contains") {
        RepoError::Duplicate("Payment has already been processed".to_string())
    } else if msg.contains("order_not_payable") {
        RepoError::Conflict("Order is not awaiting payment".to_string())
    } else {
        err.into()
    }
}
