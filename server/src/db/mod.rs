//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine) plus the repository layer.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

/// Index definitions applied at startup. Unique indexes are the durable
/// backing for the uniqueness guards the repositories rely on.
const INDEX_DEFINITIONS: &[&str] = &[
    "DEFINE INDEX IF NOT EXISTS user_mobile_unique ON TABLE user FIELDS mobile UNIQUE",
    "DEFINE INDEX IF NOT EXISTS user_username_unique ON TABLE user FIELDS username UNIQUE",
    "DEFINE INDEX IF NOT EXISTS payment_receipt_unique ON TABLE payment_receipt FIELDS payment_id UNIQUE",
    "DEFINE INDEX IF NOT EXISTS rating_once_per_party ON TABLE rating FIELDS order, rater UNIQUE",
    "DEFINE INDEX IF NOT EXISTS return_once_per_order ON TABLE return_request FIELDS order UNIQUE",
];

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database and apply index definitions
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("vinimai")
            .use_db("marketplace")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        for definition in INDEX_DEFINITIONS {
            db.query(*definition)
                .await
                .map_err(|e| AppError::database(format!("Failed to define index: {e}")))?;
        }

        tracing::info!(path = %db_path, "Database connection established (SurrealDB RocksDB)");

        Ok(Self { db })
    }
}
