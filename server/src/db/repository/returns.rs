//! Return Repository
//!
//! One return request per order (unique index); decisions and refund
//! processing are compare-and-set on the current status.

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::{ReturnRequest, ReturnStatus};
use chrono::Utc;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const RETURN_TABLE: &str = "return_request";

#[derive(Clone)]
pub struct ReturnRepository {
    base: BaseRepository,
}

impl ReturnRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// File a return. A second request for the same order violates the
    /// unique index and maps to [`RepoError::Duplicate`].
    pub async fn create(&self, request: ReturnRequest) -> RepoResult<ReturnRequest> {
        let created: Option<ReturnRequest> = self
            .base
            .db()
            .create(RETURN_TABLE)
            .content(request)
            .await
            .map_err(|e| {
                let mapped: RepoError = e.into();
                match mapped {
                    RepoError::Duplicate(_) => RepoError::Duplicate(
                        "A return has already been requested for this order".to_string(),
                    ),
                    other => other,
                }
            })?;

        created.ok_or_else(|| RepoError::Database("Failed to create return request".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ReturnRequest>> {
        let rid = make_record_id(RETURN_TABLE, id);
        let request: Option<ReturnRequest> = self.base.db().select(rid).await?;
        Ok(request)
    }

    pub async fn find_by_order(&self, order: RecordId) -> RepoResult<Option<ReturnRequest>> {
        let requests: Vec<ReturnRequest> = self
            .base
            .db()
            .query("SELECT * FROM return_request WHERE order = $order")
            .bind(("order", order.to_string()))
            .await?
            .take(0)?;
        Ok(requests.into_iter().next())
    }

    /// All return requests, newest first (admin queue)
    pub async fn find_all(&self) -> RepoResult<Vec<ReturnRequest>> {
        let requests: Vec<ReturnRequest> = self
            .base
            .db()
            .query("SELECT * FROM return_request ORDER BY requested_at DESC")
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// Admin decision on a requested return, first writer wins
    pub async fn decide(&self, id: &str, approve: bool) -> RepoResult<ReturnRequest> {
        let rid = make_record_id(RETURN_TABLE, id);
        let verdict = if approve {
            ReturnStatus::Approved
        } else {
            ReturnStatus::Rejected
        };

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $request SET status = $verdict \
                 WHERE status = 'requested' RETURN AFTER",
            )
            .bind(("request", rid))
            .bind(("verdict", verdict))
            .await?;
        let requests: Vec<ReturnRequest> = result.take(0)?;

        match requests.into_iter().next() {
            Some(request) => Ok(request),
            None => match self.find_by_id(id).await? {
                Some(_) => Err(RepoError::Conflict(
                    "Return has already been decided".to_string(),
                )),
                None => Err(RepoError::NotFound(format!("Return {id} not found"))),
            },
        }
    }

    /// Record a successful refund: approved -> processed with the gateway
    /// refund id. Guarded so a refund is never recorded twice.
    pub async fn mark_processed(&self, id: &str, refund_id: &str) -> RepoResult<ReturnRequest> {
        let rid = make_record_id(RETURN_TABLE, id);
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $request SET status = 'processed', refund_id = $refund_id, \
                 processed_at = $now WHERE status = 'approved' RETURN AFTER",
            )
            .bind(("request", rid))
            .bind(("refund_id", refund_id.to_string()))
            .bind(("now", Utc::now()))
            .await?;
        let requests: Vec<ReturnRequest> = result.take(0)?;

        match requests.into_iter().next() {
            Some(request) => Ok(request),
            None => match self.find_by_id(id).await? {
                Some(_) => Err(RepoError::Conflict(
                    "Return is not approved for processing".to_string(),
                )),
                None => Err(RepoError::NotFound(format!("Return {id} not found"))),
            },
        }
    }
}
