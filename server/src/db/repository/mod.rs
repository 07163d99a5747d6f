//! Repository Module
//!
//! CRUD and workflow queries for the SurrealDB tables. Compare-and-set
//! guards live here: every state transition is a single conditional
//! UPDATE (or transaction) so racing requests cannot interleave.

pub mod notification;
pub mod offer;
pub mod order;
pub mod product;
pub mod rating;
pub mod returns;
pub mod user;

// Re-exports
pub use notification::NotificationRepository;
pub use offer::OfferRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use rating::RatingRepository;
pub use returns::ReturnRepository;
pub use user::UserRepository;

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations surface as plain database errors; map them
        // so handlers can answer 409 instead of 500.
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" format across the whole stack
// =============================================================================
//
// All ids are surrealdb::RecordId:
//   - Parse:      let id: RecordId = "product:abc".parse()?;
//   - Construct:  let id = RecordId::from_table_key("product", "abc");
//   - Table name: id.table()
//   - Bare key:   id.key().to_string()
//   - CRUD:       db.select(id) / db.delete(id) take RecordId directly

/// Parse an id in either "table:id" or bare "id" form into a RecordId
/// for the given table.
pub fn make_record_id(table: &str, id: &str) -> RecordId {
    if let Ok(rid) = id.parse::<RecordId>() {
        if rid.table() == table {
            return rid;
        }
    }
    RecordId::from_table_key(table, id)
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
