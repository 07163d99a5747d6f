//! Payment gateway integration
//!
//! A thin trait over the Razorpay REST API so handlers stay testable.
//! Amounts cross this boundary in minor units (paise); everything above
//! it stays in [`rust_decimal::Decimal`] rupees.

pub mod signature;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::utils::{AppError, AppResult};

pub use signature::{compute_signature, verify_signature};

/// An order registered with the gateway, to be paid by the client
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    /// Amount in minor units (paise)
    pub amount: i64,
    pub currency: String,
}

/// A refund issued by the gateway
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayRefund {
    pub id: String,
    /// Amount in minor units (paise)
    pub amount: i64,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Register a gateway order for the given amount (minor units)
    async fn create_order(&self, amount_minor: i64, receipt: &str) -> AppResult<GatewayOrder>;

    /// Refund a captured payment, full amount in minor units
    async fn refund(&self, payment_id: &str, amount_minor: i64) -> AppResult<GatewayRefund>;
}

/// Razorpay REST client (basic auth with key id / key secret)
pub struct RazorpayGateway {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayGateway {
    pub fn new(
        base_url: String,
        key_id: String,
        key_secret: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            key_id,
            key_secret,
        })
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::gateway(format!("Gateway request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(target: "gateway", %status, %detail, "Gateway rejected request");
            return Err(AppError::gateway(format!(
                "Gateway returned {status}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::gateway(format!("Malformed gateway response: {e}")))
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, amount_minor: i64, receipt: &str) -> AppResult<GatewayOrder> {
        self.post_json(
            "/orders",
            json!({
                "amount": amount_minor,
                "currency": "INR",
                "receipt": receipt,
            }),
        )
        .await
    }

    async fn refund(&self, payment_id: &str, amount_minor: i64) -> AppResult<GatewayRefund> {
        self.post_json(
            &format!("/payments/{payment_id}/refund"),
            json!({ "amount": amount_minor }),
        )
        .await
    }
}

/// Offline stand-in used when no gateway credentials are configured and
/// in tests. Ids are locally generated and every call succeeds.
#[derive(Default)]
pub struct MockGateway {
    counter: AtomicU64,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_order(&self, amount_minor: i64, _receipt: &str) -> AppResult<GatewayOrder> {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        Ok(GatewayOrder {
            id: format!("order_mock{seq:08}"),
            amount: amount_minor,
            currency: "INR".to_string(),
        })
    }

    async fn refund(&self, payment_id: &str, amount_minor: i64) -> AppResult<GatewayRefund> {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        Ok(GatewayRefund {
            id: format!("rfnd_mock{seq:08}_{payment_id}"),
            amount: amount_minor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_gateway_order_ids_are_unique() {
        let gateway = MockGateway::new();
        let first = gateway.create_order(103_000, "order:1").await.unwrap();
        let second = gateway.create_order(103_000, "order:2").await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.amount, 103_000);
        assert_eq!(first.currency, "INR");
    }

    #[tokio::test]
    async fn test_mock_gateway_refund_echoes_amount() {
        let gateway = MockGateway::new();
        let refund = gateway.refund("pay_abc", 103_000).await.unwrap();

        assert_eq!(refund.amount, 103_000);
        assert!(refund.id.contains("pay_abc"));
    }
}
