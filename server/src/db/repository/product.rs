//! Product Repository
//!
//! Catalog queries plus the moderation workflow. Moderation decisions and
//! resubmissions are compare-and-set so two admins (or an admin racing a
//! seller) cannot both win.

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::{
    Category, Product, ProductCreate, ProductModification, ProductModificationCreate,
    ProductStatus,
};
use chrono::Utc;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";
const MODIFICATION_TABLE: &str = "product_modification";

const CATALOG_DEFAULT_LIMIT: u32 = 50;
const CATALOG_MAX_LIMIT: u32 = 100;

/// Optional catalog filters (public browse)
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Public catalog: approved and available listings only, newest first
    pub async fn find_catalog(&self, filter: CatalogFilter) -> RepoResult<Vec<Product>> {
        let mut conditions = vec!["status = 'approved'", "is_available = true"];

        if filter.category.is_some() {
            conditions.push("category = $category");
        }
        if filter.search.is_some() {
            conditions.push(
                "(string::contains(string::lowercase(title), $search) \
                 OR string::contains(string::lowercase(description), $search))",
            );
        }

        let limit = filter
            .limit
            .unwrap_or(CATALOG_DEFAULT_LIMIT)
            .min(CATALOG_MAX_LIMIT);
        let offset = filter.offset.unwrap_or(0);

        let query_str = format!(
            "SELECT * FROM product WHERE {} ORDER BY created_at DESC LIMIT $limit START $offset",
            conditions.join(" AND ")
        );

        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("limit", limit))
            .bind(("offset", offset));
        if let Some(category) = filter.category {
            query = query.bind(("category", category));
        }
        if let Some(search) = filter.search {
            query = query.bind(("search", search.to_lowercase()));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let rid = make_record_id(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select(rid).await?;
        Ok(product)
    }

    /// All listings of one seller regardless of status (seller dashboard)
    pub async fn find_by_seller(&self, seller: RecordId) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE seller = $seller ORDER BY created_at DESC")
            .bind(("seller", seller.to_string()))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Moderation queue, oldest submission first
    pub async fn find_pending(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE status = 'pending' ORDER BY created_at ASC")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Submit a listing. Always enters the moderation queue as pending.
    pub async fn create(&self, seller: RecordId, data: ProductCreate) -> RepoResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: None,
            title: data.title,
            description: data.description,
            price: data.price,
            category: data.category,
            images: data.images,
            seller,
            status: ProductStatus::Pending,
            is_available: true,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Admin moderation decision. Only a pending product can be decided;
    /// a second decision loses the race and reports a conflict.
    pub async fn review(&self, id: &str, approve: bool) -> RepoResult<Product> {
        let rid = make_record_id(PRODUCT_TABLE, id);
        let verdict = if approve {
            ProductStatus::Approved
        } else {
            ProductStatus::Rejected
        };

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $product SET status = $verdict, updated_at = $now \
                 WHERE status = 'pending' RETURN AFTER",
            )
            .bind(("product", rid))
            .bind(("verdict", verdict))
            .bind(("now", Utc::now()))
            .await?;
        let products: Vec<Product> = result.take(0)?;

        match products.into_iter().next() {
            Some(product) => Ok(product),
            None => match self.find_by_id(id).await? {
                Some(_) => Err(RepoError::Conflict(
                    "Product has already been reviewed".to_string(),
                )),
                None => Err(RepoError::NotFound(format!("Product {id} not found"))),
            },
        }
    }

    /// Admin pulls an approved listing from the catalog without changing
    /// its moderation status
    pub async fn delist(&self, id: &str) -> RepoResult<Product> {
        let rid = make_record_id(PRODUCT_TABLE, id);
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $product SET is_available = false, updated_at = $now \
                 WHERE status = 'approved' AND is_available = true RETURN AFTER",
            )
            .bind(("product", rid))
            .bind(("now", Utc::now()))
            .await?;
        let products: Vec<Product> = result.take(0)?;

        match products.into_iter().next() {
            Some(product) => Ok(product),
            None => match self.find_by_id(id).await? {
                Some(_) => Err(RepoError::Conflict(
                    "Product is not listed or already unavailable".to_string(),
                )),
                None => Err(RepoError::NotFound(format!("Product {id} not found"))),
            },
        }
    }

    /// Hard delete a listing (also removes its stored modifications)
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = make_record_id(PRODUCT_TABLE, id);

        self.base
            .db()
            .query("DELETE product_modification WHERE product = $product")
            .bind(("product", rid.to_string()))
            .await?;

        let deleted: Option<Product> = self.base.db().delete(rid).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Product {id} not found")));
        }
        Ok(())
    }

    // =========================================================================
    // Modifications
    // =========================================================================

    /// Store a proposed edit without touching the live product
    pub async fn create_modification(
        &self,
        product: RecordId,
        data: ProductModificationCreate,
    ) -> RepoResult<ProductModification> {
        let modification = ProductModification {
            id: None,
            product,
            title: data.title,
            description: data.description,
            price: data.price,
            category: data.category,
            images: data.images,
            status: ProductStatus::Pending,
            requested_at: Utc::now(),
        };

        let created: Option<ProductModification> = self
            .base
            .db()
            .create(MODIFICATION_TABLE)
            .content(modification)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create modification".to_string()))
    }

    pub async fn find_modification_by_id(
        &self,
        id: &str,
    ) -> RepoResult<Option<ProductModification>> {
        let rid = make_record_id(MODIFICATION_TABLE, id);
        let modification: Option<ProductModification> = self.base.db().select(rid).await?;
        Ok(modification)
    }

    /// The at-most-one pending edit for a product
    pub async fn find_pending_modification(
        &self,
        product: RecordId,
    ) -> RepoResult<Option<ProductModification>> {
        let modifications: Vec<ProductModification> = self
            .base
            .db()
            .query(
                "SELECT * FROM product_modification \
                 WHERE product = $product AND status = 'pending' \
                 ORDER BY requested_at DESC",
            )
            .bind(("product", product.to_string()))
            .await?
            .take(0)?;
        Ok(modifications.into_iter().next())
    }

    /// Every pending edit across all products (admin review queue)
    pub async fn find_pending_modifications(&self) -> RepoResult<Vec<ProductModification>> {
        let modifications: Vec<ProductModification> = self
            .base
            .db()
            .query(
                "SELECT * FROM product_modification WHERE status = 'pending' \
                 ORDER BY requested_at ASC",
            )
            .await?
            .take(0)?;
        Ok(modifications)
    }

    /// Apply a stored modification and requeue the product for review.
    ///
    /// Single transaction: the modification is consumed (pending ->
    /// approved) and the product rewritten with the merged fields and
    /// status reset to pending. If the modification was already consumed
    /// the transaction throws and nothing changes.
    pub async fn resubmit(
        &self,
        product: &Product,
        modification: &ProductModification,
    ) -> RepoResult<Product> {
        let product_id = product
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Product has no id".to_string()))?;
        let modification_id = modification
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Modification has no id".to_string()))?;

        // Merge proposed fields over the current listing
        let title = modification.title.clone().unwrap_or_else(|| product.title.clone());
        let description = modification
            .description
            .clone()
            .unwrap_or_else(|| product.description.clone());
        let price = modification.price.unwrap_or(product.price);
        let category = modification.category.unwrap_or(product.category);
        let images = modification.images.clone().unwrap_or_else(|| product.images.clone());

        let result = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 LET $consumed = UPDATE $modification SET status = 'approved' \
                     WHERE status = 'pending' RETURN AFTER;
                 IF array::len($consumed) == 0 {
                     THROW 'modification_consumed';
                 };
                 LET $updated = UPDATE $product SET \
                     title = $title, description = $description, price = $price, \
                     category = $category, images = $images, \
                     status = 'pending', updated_at = $now RETURN AFTER;
                 RETURN $updated[0];
                 COMMIT TRANSACTION;",
            )
            .bind(("modification", modification_id))
            .bind(("product", product_id))
            .bind(("title", title))
            .bind(("description", description))
            .bind(("price", price))
            .bind(("category", category))
            .bind(("images", images))
            .bind(("now", Utc::now()))
            .await;

        let mut response = match result {
            Ok(response) => response,
            Err(e) if e.to_string().contains("modification_consumed") => {
                return Err(RepoError::Conflict(
                    "Modification has already been applied".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let updated: Option<Product> = match response.take(0) {
            Ok(updated) => updated,
            Err(e) if e.to_string().contains("modification_consumed") => {
                return Err(RepoError::Conflict(
                    "Modification has already been applied".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };
        updated.ok_or_else(|| RepoError::Database("Resubmit returned no product".to_string()))
    }
}
