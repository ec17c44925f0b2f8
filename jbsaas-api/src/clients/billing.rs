/// Billing checkout client
///
/// Creates hosted checkout sessions with the billing provider. The server
/// only hands off: it records the pending subscription row and returns the
/// checkout URL for the browser to complete. Webhook-driven fulfilment is
/// the provider's side of the contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Checkout creation failure
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    /// Transport-level failure
    #[error("Request failed: {0}")]
    Request(String),

    /// Provider returned a non-success status
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Provider response did not contain a checkout URL
    #[error("Malformed provider response: {0}")]
    Malformed(String),

    /// Plan has no price configured with the provider
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),
}

/// A hosted checkout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// URL the browser should be sent to
    pub checkout_url: String,

    /// Provider-issued session ID
    pub checkout_id: String,
}

/// Creates hosted checkout sessions
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Provider name, stored on the subscription row
    fn name(&self) -> &str;

    /// Creates a checkout session for a plan
    async fn create_checkout(
        &self,
        plan: &str,
        customer_email: &str,
    ) -> Result<CheckoutSession, BillingError>;
}

/// Paddle Billing API client
pub struct PaddleCheckout {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

const PADDLE_BASE_URL: &str = "https://api.paddle.com";

/// Maps plan names to Paddle price IDs
fn price_id_for(plan: &str) -> Option<&'static str> {
    match plan {
        "starter" => Some("pri_starter_monthly"),
        "professional" => Some("pri_professional_monthly"),
        "enterprise" => Some("pri_enterprise_monthly"),
        _ => None,
    }
}

impl PaddleCheckout {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: PADDLE_BASE_URL.to_string(),
        }
    }

    /// Overrides the base URL (sandbox or test server)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[derive(Debug, Serialize)]
struct CreateTransactionRequest<'a> {
    items: Vec<TransactionItem<'a>>,
    customer_email: &'a str,
}

#[derive(Debug, Serialize)]
struct TransactionItem<'a> {
    price_id: &'a str,
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    data: TransactionData,
}

#[derive(Debug, Deserialize)]
struct TransactionData {
    id: String,
    checkout: Option<TransactionCheckout>,
}

#[derive(Debug, Deserialize)]
struct TransactionCheckout {
    url: Option<String>,
}

#[async_trait]
impl CheckoutProvider for PaddleCheckout {
    fn name(&self) -> &str {
        "paddle"
    }

    async fn create_checkout(
        &self,
        plan: &str,
        customer_email: &str,
    ) -> Result<CheckoutSession, BillingError> {
        let price_id =
            price_id_for(plan).ok_or_else(|| BillingError::UnknownPlan(plan.to_string()))?;

        let body = CreateTransactionRequest {
            items: vec![TransactionItem {
                price_id,
                quantity: 1,
            }],
            customer_email,
        };

        let response = self
            .client
            .post(format!("{}/transactions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BillingError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BillingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let transaction: TransactionResponse = response
            .json()
            .await
            .map_err(|e| BillingError::Malformed(e.to_string()))?;

        let checkout_url = transaction
            .data
            .checkout
            .and_then(|c| c.url)
            .ok_or_else(|| BillingError::Malformed("no checkout URL in response".to_string()))?;

        Ok(CheckoutSession {
            checkout_url,
            checkout_id: transaction.data.id,
        })
    }
}

/// Deterministic checkout for development and tests
pub struct MockCheckout;

#[async_trait]
impl CheckoutProvider for MockCheckout {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create_checkout(
        &self,
        plan: &str,
        _customer_email: &str,
    ) -> Result<CheckoutSession, BillingError> {
        if price_id_for(plan).is_none() {
            return Err(BillingError::UnknownPlan(plan.to_string()));
        }

        Ok(CheckoutSession {
            checkout_url: format!("https://checkout.example.com/session/{plan}"),
            checkout_id: format!("txn_mock_{plan}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_checkout_returns_session() {
        let session = MockCheckout
            .create_checkout("starter", "owner@example.com.au")
            .await
            .unwrap();

        assert!(session.checkout_url.contains("starter"));
        assert!(!session.checkout_id.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_plan_rejected() {
        let err = MockCheckout
            .create_checkout("platinum", "owner@example.com.au")
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::UnknownPlan(_)));
    }

    #[test]
    fn test_known_plans_have_prices() {
        for plan in ["starter", "professional", "enterprise"] {
            assert!(price_id_for(plan).is_some());
        }
    }
}
