//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::convert::{is_self_or_admin, user_record_id};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    Category, Product, ProductCreate, ProductModification, ProductModificationCreate,
    ProductStatus, UserRole,
};
use crate::db::repository::product::CatalogFilter;
use crate::utils::validation::{
    MAX_TEXT_LEN, MAX_TITLE_LEN, validate_amount, validate_required_text,
};
use crate::utils::{AppError, AppResult};

const MAX_IMAGES: usize = 10;

fn validate_listing_fields(
    title: Option<&str>,
    description: Option<&str>,
    price: Option<rust_decimal::Decimal>,
    images: Option<&[String]>,
) -> AppResult<()> {
    if let Some(title) = title {
        validate_required_text(title, "title", MAX_TITLE_LEN)?;
    }
    if let Some(description) = description {
        validate_required_text(description, "description", MAX_TEXT_LEN)?;
    }
    if let Some(price) = price {
        validate_amount(price, "price")?;
    }
    if let Some(images) = images
        && images.len() > MAX_IMAGES
    {
        return Err(AppError::validation(format!(
            "at most {MAX_IMAGES} images allowed"
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// GET /api/products - public catalog (approved + available only)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state
        .products
        .find_catalog(CatalogFilter {
            category: query.category,
            search: query.search.filter(|s| !s.trim().is_empty()),
            limit: query.limit,
            offset: query.offset,
        })
        .await?;

    Ok(Json(products))
}

/// GET /api/products/{id} - public for listable products; the owning
/// seller and admins can also see pending/rejected/delisted ones
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: Option<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state
        .products
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;

    if product.is_listable() {
        return Ok(Json(product));
    }

    let visible = user
        .map(|u| u.is_admin() || u.id == product.seller.to_string())
        .unwrap_or(false);
    if !visible {
        return Err(AppError::not_found(format!("Product {id}")));
    }

    Ok(Json(product))
}

/// GET /api/products/seller/{seller_id} - a seller's own listings
pub async fn list_by_seller(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(seller_id): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    if !is_self_or_admin(&user, &seller_id) {
        return Err(AppError::forbidden("Can only view your own listings"));
    }

    let seller = crate::db::repository::make_record_id("user", &seller_id);
    let products = state.products.find_by_seller(seller).await?;
    Ok(Json(products))
}

/// POST /api/products - submit a listing for moderation
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    if user.role != UserRole::Seller {
        return Err(AppError::forbidden("Only sellers can list products"));
    }
    validate_listing_fields(
        Some(&payload.title),
        Some(&payload.description),
        Some(payload.price),
        Some(&payload.images),
    )?;

    let seller = user_record_id(&user)?;
    let product = state.products.create(seller, payload).await?;

    state
        .notifier()
        .notify_admins(
            "product_submitted",
            "New product listing",
            &format!(
                "\"{}\" by {} is waiting for review",
                product.title, user.username
            ),
        )
        .await;

    Ok(Json(product))
}

/// POST /api/products/{id}/modifications - store a proposed edit
pub async fn create_modification(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductModificationCreate>,
) -> AppResult<Json<ProductModification>> {
    if payload.is_empty() {
        return Err(AppError::validation(
            "Modification must propose at least one change",
        ));
    }
    validate_listing_fields(
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.price,
        payload.images.as_deref(),
    )?;

    let product = state
        .products
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;

    if user.id != product.seller.to_string() {
        return Err(AppError::forbidden("Only the owning seller can edit a listing"));
    }
    if product.status == ProductStatus::Approved {
        return Err(AppError::conflict(
            "Approved listings cannot be edited; delist first",
        ));
    }

    let product_id = product
        .id
        .ok_or_else(|| AppError::internal("Product record has no id"))?;
    let modification = state
        .products
        .create_modification(product_id, payload)
        .await?;

    Ok(Json(modification))
}

/// POST /api/products/{id}/resubmit - apply the latest pending edit and
/// requeue the product for review
pub async fn resubmit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state
        .products
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;

    if user.id != product.seller.to_string() {
        return Err(AppError::forbidden(
            "Only the owning seller can resubmit a listing",
        ));
    }

    let product_id = product
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Product record has no id"))?;
    let modification = state
        .products
        .find_pending_modification(product_id)
        .await?
        .ok_or_else(|| AppError::validation("No pending modification to apply"))?;

    let updated = state.products.resubmit(&product, &modification).await?;

    state
        .notifier()
        .notify_admins(
            "product_resubmitted",
            "Product resubmitted",
            &format!(
                "\"{}\" by {} was updated and is waiting for re-review",
                updated.title, user.username
            ),
        )
        .await;

    Ok(Json(updated))
}
