//! Stripe Subscription Source
//!
//! Reads subscription status and checkout sessions from the Stripe REST API
//! (`GET /v1/subscriptions/{id}`, `GET /v1/checkout/sessions/{id}`, bearer
//! `STRIPE_SECRET_KEY`).

use std::collections::HashMap;
use std::time::Duration;

use platform::config::env_string;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use zeroize::Zeroizing;

use crate::domain::entity::CheckoutSession;
use crate::domain::repository::SubscriptionSource;
use crate::domain::value_object::SubscriptionStatus;
use crate::error::{AccessError, AccessResult};

pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct SubscriptionObject {
    status: SubscriptionStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CheckoutSessionObject {
    payment_status: Option<String>,
    status: Option<String>,
    mode: Option<String>,
    metadata: HashMap<String, String>,
    customer: Option<String>,
    subscription: Option<String>,
}

impl From<CheckoutSessionObject> for CheckoutSession {
    fn from(obj: CheckoutSessionObject) -> Self {
        let paid = obj.payment_status.as_deref() == Some("paid") || obj.status.as_deref() == Some("complete");
        Self {
            paid,
            product: obj.metadata.get("product").map(|p| p.to_ascii_lowercase()),
            one_time: obj.mode.as_deref() == Some("payment"),
            customer_id: obj.customer.filter(|id| !id.is_empty()),
            subscription_id: obj.subscription.filter(|id| !id.is_empty()),
        }
    }
}

/// Subscription lookups against Stripe
///
/// Without a secret key every lookup fails, which denies subscription plans
/// with `subscription_check_failed`.
pub struct StripeSubscriptionSource {
    client: reqwest::Client,
    secret_key: Option<Zeroizing<String>>,
    base_url: String,
}

impl StripeSubscriptionSource {
    pub fn new(secret_key: Option<String>, base_url: impl Into<String>) -> AccessResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AccessError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            secret_key: secret_key.filter(|k| !k.is_empty()).map(Zeroizing::new),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Key from `STRIPE_SECRET_KEY`, API base from `STRIPE_API_BASE` if set
    pub fn from_env() -> AccessResult<Self> {
        let key = env_string("STRIPE_SECRET_KEY");
        if key.is_none() {
            tracing::warn!("STRIPE_SECRET_KEY not set, subscription plans cannot be verified");
        }
        let base = env_string("STRIPE_API_BASE").unwrap_or_else(|| STRIPE_API_BASE.to_string());
        Self::new(key, base)
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }
}

impl StripeSubscriptionSource {
    /// Authenticated GET of a Stripe object
    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> AccessResult<T> {
        let key = self
            .secret_key
            .as_ref()
            .ok_or_else(|| AccessError::SubscriptionSource("STRIPE_SECRET_KEY not configured".to_string()))?;

        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .bearer_auth(key.as_str())
            .send()
            .await
            .map_err(|e| AccessError::SubscriptionSource(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AccessError::SubscriptionSource(format!(
                "Stripe responded with {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AccessError::SubscriptionSource(format!("Unexpected Stripe response: {e}")))
    }
}

impl SubscriptionSource for StripeSubscriptionSource {
    async fn subscription_status(&self, subscription_id: &str) -> AccessResult<SubscriptionStatus> {
        let subscription: SubscriptionObject = self
            .fetch(&format!("/v1/subscriptions/{subscription_id}"))
            .await?;

        tracing::debug!(
            subscription_id = %subscription_id,
            status = %subscription.status,
            "Subscription status fetched"
        );
        Ok(subscription.status)
    }

    async fn checkout_session(&self, session_id: &str) -> AccessResult<CheckoutSession> {
        let session: CheckoutSessionObject = self
            .fetch(&format!("/v1/checkout/sessions/{session_id}"))
            .await?;
        let session = CheckoutSession::from(session);

        tracing::debug!(
            session_id = %session_id,
            paid = session.paid,
            "Checkout session fetched"
        );
        Ok(session)
    }
}
