//! Database models
//!
//! One file per entity, matching the SurrealDB tables. Record ids follow
//! the "table:id" convention end to end.

pub mod serde_helpers;

pub mod notification;
pub mod offer;
pub mod order;
pub mod product;
pub mod rating;
pub mod return_request;
pub mod user;

pub use notification::Notification;
pub use offer::{Offer, OfferCreate, OfferId, OfferStatus};
pub use order::{Order, OrderCreate, OrderId, OrderStatus, PaymentReceipt};
pub use product::{
    Category, Product, ProductCreate, ProductId, ProductModification,
    ProductModificationCreate, ProductStatus,
};
pub use rating::{Rating, RatingCreate};
pub use return_request::{ReturnCreate, ReturnRequest, ReturnStatus, ReturnType};
pub use user::{User, UserCreate, UserId, UserPublic, UserRole};
