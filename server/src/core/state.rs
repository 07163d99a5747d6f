//! Shared server state
//!
//! One [`ServerState`] is built at startup and cloned into every handler
//! through axum's state mechanism. Repositories clone cheaply (they hold
//! the database handle); the heavier services are behind [`Arc`].

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{JwtService, OtpCache, RateLimiter};
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{
    NotificationRepository, OfferRepository, OrderRepository, ProductRepository,
    RatingRepository, ReturnRepository, UserRepository,
};
use crate::payment::{MockGateway, PaymentGateway, RazorpayGateway};
use crate::services::Notifier;
use crate::utils::AppResult;

#[derive(Clone)]
pub struct ServerState {
    config: Arc<Config>,
    jwt_service: Arc<JwtService>,
    gateway: Arc<dyn PaymentGateway>,
    otp_cache: Arc<OtpCache>,
    auth_limiter: Arc<RateLimiter>,
    general_limiter: Arc<RateLimiter>,
    notifier: Notifier,

    pub users: UserRepository,
    pub products: ProductRepository,
    pub offers: OfferRepository,
    pub orders: OrderRepository,
    pub returns: ReturnRepository,
    pub notifications: NotificationRepository,
    pub ratings: RatingRepository,
}

impl ServerState {
    /// Build the full state: open the database, wire the repositories and
    /// pick the payment gateway.
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let db_path = config.db_path();
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        let db = db_service.db.clone();

        let gateway: Arc<dyn PaymentGateway> = match (
            config.razorpay_key_id.clone(),
            config.razorpay_key_secret.clone(),
        ) {
            (Some(key_id), Some(key_secret)) => Arc::new(RazorpayGateway::new(
                config.gateway_base_url.clone(),
                key_id,
                key_secret,
                Duration::from_secs(config.gateway_timeout_secs),
            )?),
            _ => {
                if config.is_production() {
                    tracing::error!("Razorpay credentials missing in production");
                } else {
                    tracing::warn!("No gateway credentials configured, using mock gateway");
                }
                Arc::new(MockGateway::new())
            }
        };

        let notifications = NotificationRepository::new(db.clone());
        let notifier = Notifier::new(notifications.clone());

        Ok(Self {
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            otp_cache: Arc::new(OtpCache::new(Duration::from_secs(config.otp_ttl_secs))),
            auth_limiter: Arc::new(RateLimiter::new(
                config.auth_rate_limit.max_requests,
                config.auth_rate_limit.window(),
            )),
            general_limiter: Arc::new(RateLimiter::new(
                config.general_rate_limit.max_requests,
                config.general_rate_limit.window(),
            )),
            gateway,
            notifier,
            users: UserRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            offers: OfferRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            returns: ReturnRepository::new(db.clone()),
            ratings: RatingRepository::new(db),
            notifications,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn gateway(&self) -> &dyn PaymentGateway {
        self.gateway.as_ref()
    }

    pub fn otp_cache(&self) -> &OtpCache {
        &self.otp_cache
    }

    pub fn auth_limiter(&self) -> &RateLimiter {
        &self.auth_limiter
    }

    pub fn general_limiter(&self) -> &RateLimiter {
        &self.general_limiter
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}
