//! End-to-end repository workflow tests against a real embedded database.
//!
//! Each test opens its own temporary RocksDB instance so the uniqueness
//! indexes and compare-and-set guards are exercised for real, not mocked.

use chrono::Utc;
use rust_decimal::Decimal;
use tempfile::TempDir;

use vinimai_server::db::DbService;
use vinimai_server::db::models::{
    Category, OfferStatus, Order, OrderStatus, ProductCreate, ReturnRequest, ReturnStatus,
    ReturnType, UserCreate, UserRole,
};
use vinimai_server::db::repository::product::CatalogFilter;
use vinimai_server::db::repository::{
    OfferRepository, OrderRepository, ProductRepository, RepoError, ReturnRepository,
    UserRepository,
};
use vinimai_server::fees::calculate_fees;

async fn open_db() -> (TempDir, DbService) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("test.db");
    let service = DbService::new(&path.to_string_lossy())
        .await
        .expect("database must open");
    (dir, service)
}

fn user_create(username: &str, mobile: &str, role: UserRole) -> UserCreate {
    UserCreate {
        username: username.to_string(),
        mobile: mobile.to_string(),
        email: None,
        password: "Secure@123".to_string(),
        role,
    }
}

fn product_create(title: &str, price: i64) -> ProductCreate {
    ProductCreate {
        title: title.to_string(),
        description: "Barely used, original packaging".to_string(),
        price: Decimal::new(price, 0),
        category: Category::Electronics,
        images: vec![],
    }
}

fn order_for(
    buyer: surrealdb::RecordId,
    seller: surrealdb::RecordId,
    product: surrealdb::RecordId,
    price: Decimal,
) -> Order {
    let fees = calculate_fees(price);
    let now = Utc::now();
    Order {
        id: None,
        buyer,
        seller,
        product,
        offer: None,
        final_price: price,
        buyer_fee: fees.buyer_fee,
        seller_fee: fees.seller_fee,
        platform_fee: fees.platform_fee,
        status: OrderStatus::Placed,
        delivery_address: "12 MG Road, Kochi".to_string(),
        gateway_order_id: None,
        delivered_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// Seed a seller plus one approved, available product; returns (seller id,
/// product id).
async fn seed_listing(
    users: &UserRepository,
    products: &ProductRepository,
) -> (surrealdb::RecordId, surrealdb::RecordId) {
    let seller = users
        .create(user_create("ravi_seller", "9800000001", UserRole::Seller))
        .await
        .expect("seller created");
    let seller_id = seller.id.expect("seller id");

    let product = products
        .create(seller_id.clone(), product_create("Used DSLR camera", 1000))
        .await
        .expect("product created");
    let product_id = product.id.expect("product id");

    products
        .review(&product_id.to_string(), true)
        .await
        .expect("product approved");

    (seller_id, product_id)
}

#[tokio::test]
async fn test_duplicate_mobile_rejected() {
    let (_dir, db) = open_db().await;
    let users = UserRepository::new(db.db.clone());

    users
        .create(user_create("asha", "9876543210", UserRole::Buyer))
        .await
        .expect("first registration succeeds");

    let err = users
        .create(user_create("asha_two", "9876543210", UserRole::Buyer))
        .await
        .expect_err("same mobile must be rejected");
    assert!(matches!(err, RepoError::Duplicate(_)), "got {err:?}");
}

#[tokio::test]
async fn test_moderation_decision_is_single_shot() {
    let (_dir, db) = open_db().await;
    let users = UserRepository::new(db.db.clone());
    let products = ProductRepository::new(db.db.clone());

    let seller = users
        .create(user_create("ravi", "9800000001", UserRole::Seller))
        .await
        .unwrap();
    let product = products
        .create(seller.id.unwrap(), product_create("Old phone", 500))
        .await
        .unwrap();
    let id = product.id.unwrap().to_string();

    let approved = products.review(&id, true).await.expect("first decision wins");
    assert!(approved.is_listable());

    let err = products
        .review(&id, false)
        .await
        .expect_err("second decision must lose");
    assert!(matches!(err, RepoError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn test_order_placement_consumes_availability() {
    let (_dir, db) = open_db().await;
    let users = UserRepository::new(db.db.clone());
    let products = ProductRepository::new(db.db.clone());
    let orders = OrderRepository::new(db.db.clone());

    let (seller_id, product_id) = seed_listing(&users, &products).await;

    let buyer = users
        .create(user_create("asha_buyer", "9800000002", UserRole::Buyer))
        .await
        .unwrap();
    let buyer_id = buyer.id.unwrap();

    let price = Decimal::new(1000, 0);
    let first = orders
        .create_placed(
            product_id.clone(),
            order_for(buyer_id.clone(), seller_id.clone(), product_id.clone(), price),
        )
        .await
        .expect("first buyer wins");
    assert_eq!(first.status, OrderStatus::Placed);
    assert_eq!(first.platform_fee, Decimal::new(60, 0));

    // Product is off the market now; a second order must fail cleanly
    let err = orders
        .create_placed(
            product_id.clone(),
            order_for(buyer_id, seller_id, product_id.clone(), price),
        )
        .await
        .expect_err("second buyer must lose");
    assert!(matches!(err, RepoError::Conflict(_)), "got {err:?}");

    let product = products
        .find_by_id(&product_id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert!(!product.is_available);
}

#[tokio::test]
async fn test_catalog_hides_unlisted_products() {
    let (_dir, db) = open_db().await;
    let users = UserRepository::new(db.db.clone());
    let products = ProductRepository::new(db.db.clone());

    let seller = users
        .create(user_create("ravi_seller", "9800000001", UserRole::Seller))
        .await
        .unwrap();
    let seller_id = seller.id.unwrap();

    // Four listings, only the last one belongs in the catalog
    products
        .create(seller_id.clone(), product_create("Pending tablet", 300))
        .await
        .unwrap();

    let rejected = products
        .create(seller_id.clone(), product_create("Rejected speaker", 400))
        .await
        .unwrap();
    products
        .review(&rejected.id.unwrap().to_string(), false)
        .await
        .unwrap();

    let delisted = products
        .create(seller_id.clone(), product_create("Delisted monitor", 500))
        .await
        .unwrap();
    let delisted_id = delisted.id.unwrap().to_string();
    products.review(&delisted_id, true).await.unwrap();
    products.delist(&delisted_id).await.unwrap();

    let live = products
        .create(seller_id, product_create("Noise cancelling headphones", 600))
        .await
        .unwrap();
    products.review(&live.id.unwrap().to_string(), true).await.unwrap();

    let catalog = products.find_catalog(CatalogFilter::default()).await.unwrap();
    assert_eq!(catalog.len(), 1, "only approved+available listings show");
    assert_eq!(catalog[0].title, "Noise cancelling headphones");

    // Category filter still excludes everything unlisted
    let catalog = products
        .find_catalog(CatalogFilter {
            category: Some(Category::Electronics),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(catalog.len(), 1);

    let catalog = products
        .find_catalog(CatalogFilter {
            category: Some(Category::Fashion),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(catalog.is_empty());

    // Search matches title OR description, case-insensitively. Every
    // seeded description contains "packaging", but only the live listing
    // may surface.
    let catalog = products
        .find_catalog(CatalogFilter {
            search: Some("PACKAGING".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].title, "Noise cancelling headphones");

    // A title hit on an unlisted product stays hidden
    let catalog = products
        .find_catalog(CatalogFilter {
            search: Some("tablet".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(catalog.is_empty());

    let catalog = products
        .find_catalog(CatalogFilter {
            search: Some("Headphones".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(catalog.len(), 1);
}

#[tokio::test]
async fn test_payment_confirmation_rejects_replay() {
    let (_dir, db) = open_db().await;
    let users = UserRepository::new(db.db.clone());
    let products = ProductRepository::new(db.db.clone());
    let orders = OrderRepository::new(db.db.clone());

    let (seller_id, product_id) = seed_listing(&users, &products).await;
    let buyer = users
        .create(user_create("asha_buyer", "9800000002", UserRole::Buyer))
        .await
        .unwrap();

    let order = orders
        .create_placed(
            product_id.clone(),
            order_for(
                buyer.id.unwrap(),
                seller_id,
                product_id,
                Decimal::new(1000, 0),
            ),
        )
        .await
        .unwrap();
    let order_id = order.id.unwrap();

    orders
        .set_gateway_order(&order_id.to_string(), "order_gw1")
        .await
        .expect("gateway order registered");

    let confirmed = orders
        .confirm_payment(order_id.clone(), "order_gw1", "pay_001")
        .await
        .expect("first confirmation succeeds");
    assert_eq!(confirmed.status, OrderStatus::Confirmed);

    // Same payment id again: dies on the receipt unique index
    let err = orders
        .confirm_payment(order_id.clone(), "order_gw1", "pay_001")
        .await
        .expect_err("replay must be rejected");
    assert!(matches!(err, RepoError::Duplicate(_)), "got {err:?}");

    // Fresh payment id against an already-confirmed order: status guard
    let err = orders
        .confirm_payment(order_id.clone(), "order_gw1", "pay_002")
        .await
        .expect_err("order is no longer payable");
    assert!(matches!(err, RepoError::Conflict(_)), "got {err:?}");

    let receipt = orders
        .find_receipt(order_id)
        .await
        .unwrap()
        .expect("receipt recorded");
    assert_eq!(receipt.payment_id, "pay_001");
}

#[tokio::test]
async fn test_payment_must_reference_registered_gateway_order() {
    let (_dir, db) = open_db().await;
    let users = UserRepository::new(db.db.clone());
    let products = ProductRepository::new(db.db.clone());
    let orders = OrderRepository::new(db.db.clone());

    let (seller_id, product_id) = seed_listing(&users, &products).await;
    let buyer = users
        .create(user_create("asha_buyer", "9800000002", UserRole::Buyer))
        .await
        .unwrap();

    let order = orders
        .create_placed(
            product_id.clone(),
            order_for(
                buyer.id.unwrap(),
                seller_id,
                product_id,
                Decimal::new(1000, 0),
            ),
        )
        .await
        .unwrap();
    let order_id = order.id.unwrap();

    // No gateway order registered yet: nothing can confirm
    let err = orders
        .confirm_payment(order_id.clone(), "order_gw1", "pay_001")
        .await
        .expect_err("unregistered gateway order must not confirm");
    assert!(matches!(err, RepoError::Conflict(_)), "got {err:?}");

    let updated = orders
        .set_gateway_order(&order_id.to_string(), "order_gw1")
        .await
        .unwrap();
    assert_eq!(updated.gateway_order_id.as_deref(), Some("order_gw1"));

    // A signed confirmation for some other gateway order must not land here
    let err = orders
        .confirm_payment(order_id.clone(), "order_gw_other", "pay_002")
        .await
        .expect_err("wrong gateway order must not confirm");
    assert!(matches!(err, RepoError::Conflict(_)), "got {err:?}");

    let confirmed = orders
        .confirm_payment(order_id, "order_gw1", "pay_003")
        .await
        .expect("registered gateway order confirms");
    assert_eq!(confirmed.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn test_status_progression_guard() {
    let (_dir, db) = open_db().await;
    let users = UserRepository::new(db.db.clone());
    let products = ProductRepository::new(db.db.clone());
    let orders = OrderRepository::new(db.db.clone());

    let (seller_id, product_id) = seed_listing(&users, &products).await;
    let buyer = users
        .create(user_create("asha_buyer", "9800000002", UserRole::Buyer))
        .await
        .unwrap();

    let order = orders
        .create_placed(
            product_id.clone(),
            order_for(
                buyer.id.unwrap(),
                seller_id,
                product_id,
                Decimal::new(1000, 0),
            ),
        )
        .await
        .unwrap();
    let id = order.id.clone().unwrap().to_string();

    orders.set_gateway_order(&id, "order_gw1").await.unwrap();
    orders
        .confirm_payment(order.id.clone().unwrap(), "order_gw1", "pay_001")
        .await
        .unwrap();

    // Stale expectation loses
    let err = orders
        .progress_status(&id, OrderStatus::Placed, OrderStatus::PickedUp)
        .await
        .expect_err("order already left placed");
    assert!(matches!(err, RepoError::Conflict(_)), "got {err:?}");

    let delivered = orders
        .progress_status(&id, OrderStatus::Confirmed, OrderStatus::Delivered)
        .await
        .expect("skip to delivered is allowed");
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert!(delivered.delivered_at.is_some());
}

#[tokio::test]
async fn test_one_return_per_order() {
    let (_dir, db) = open_db().await;
    let users = UserRepository::new(db.db.clone());
    let products = ProductRepository::new(db.db.clone());
    let orders = OrderRepository::new(db.db.clone());
    let returns = ReturnRepository::new(db.db.clone());

    let (seller_id, product_id) = seed_listing(&users, &products).await;
    let buyer = users
        .create(user_create("asha_buyer", "9800000002", UserRole::Buyer))
        .await
        .unwrap();

    let order = orders
        .create_placed(
            product_id.clone(),
            order_for(
                buyer.id.unwrap(),
                seller_id,
                product_id,
                Decimal::new(1000, 0),
            ),
        )
        .await
        .unwrap();
    let order_id = order.id.clone().unwrap();

    let request = ReturnRequest {
        id: None,
        order: order_id.clone(),
        reason: "Screen is cracked".to_string(),
        return_type: ReturnType::WithinDays,
        status: ReturnStatus::Requested,
        refund_amount: order.buyer_total(),
        refund_id: None,
        requested_at: Utc::now(),
        processed_at: None,
    };

    let created = returns.create(request.clone()).await.expect("first request");
    assert_eq!(created.status, ReturnStatus::Requested);
    assert_eq!(created.refund_amount, Decimal::new(1030, 0));

    let err = returns
        .create(request)
        .await
        .expect_err("second request for the same order");
    assert!(matches!(err, RepoError::Duplicate(_)), "got {err:?}");

    // Decision and processing are CAS-guarded too
    let id = created.id.unwrap().to_string();
    returns.decide(&id, true).await.expect("approve");
    let err = returns.decide(&id, false).await.expect_err("already decided");
    assert!(matches!(err, RepoError::Conflict(_)), "got {err:?}");

    let processed = returns
        .mark_processed(&id, "rfnd_001")
        .await
        .expect("refund recorded");
    assert_eq!(processed.status, ReturnStatus::Processed);
    assert_eq!(processed.refund_id.as_deref(), Some("rfnd_001"));
    let err = returns
        .mark_processed(&id, "rfnd_002")
        .await
        .expect_err("refund recorded once");
    assert!(matches!(err, RepoError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn test_offer_decision_first_writer_wins() {
    let (_dir, db) = open_db().await;
    let users = UserRepository::new(db.db.clone());
    let products = ProductRepository::new(db.db.clone());
    let offers = OfferRepository::new(db.db.clone());

    let (seller_id, product_id) = seed_listing(&users, &products).await;
    let buyer = users
        .create(user_create("asha_buyer", "9800000002", UserRole::Buyer))
        .await
        .unwrap();

    let offer = offers
        .create(
            product_id,
            buyer.id.unwrap(),
            seller_id,
            Decimal::new(900, 0),
            Some("Would you take 900?".to_string()),
        )
        .await
        .expect("offer created");
    let id = offer.id.unwrap().to_string();

    let accepted = offers
        .decide(&id, OfferStatus::Accepted)
        .await
        .expect("first decision wins");
    assert_eq!(accepted.status, OfferStatus::Accepted);

    let err = offers
        .decide(&id, OfferStatus::Rejected)
        .await
        .expect_err("second decision must lose");
    assert!(matches!(err, RepoError::Conflict(_)), "got {err:?}");

    // Pending is not a decision
    let err = offers
        .decide(&id, OfferStatus::Pending)
        .await
        .expect_err("pending is not a verdict");
    assert!(matches!(err, RepoError::Validation(_)), "got {err:?}");
}
