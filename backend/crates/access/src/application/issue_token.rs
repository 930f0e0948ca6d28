//! Issue Access Token Use Case
//!
//! Mints the signed credential handed out after a completed purchase.

use std::sync::Arc;

use platform::clock::SharedClock;

use crate::application::config::AccessConfig;
use crate::application::token::SharedSigner;
use crate::domain::entity::AccessTokenPayload;
use crate::domain::value_object::AccessPlan;
use crate::error::{AccessError, AccessResult};

/// Issue input
#[derive(Debug, Clone)]
pub struct IssueAccessTokenInput {
    pub plan: AccessPlan,
    pub customer_id: String,
    pub subscription_id: Option<String>,
}

/// Issue output
#[derive(Debug, Clone)]
pub struct IssueAccessTokenOutput {
    pub token: String,
    pub payload: AccessTokenPayload,
    /// Cookie Max-Age matching the token lifetime
    pub max_age_secs: i64,
}

/// Issue access token use case
pub struct IssueAccessTokenUseCase {
    signer: SharedSigner,
    config: Arc<AccessConfig>,
    clock: SharedClock,
}

impl IssueAccessTokenUseCase {
    pub fn new(signer: SharedSigner, config: Arc<AccessConfig>, clock: SharedClock) -> Self {
        Self {
            signer,
            config,
            clock,
        }
    }

    pub fn execute(&self, input: IssueAccessTokenInput) -> AccessResult<IssueAccessTokenOutput> {
        let customer_id = input.customer_id.trim();
        if customer_id.is_empty() {
            return Err(AccessError::InvalidRequest("customer id is required".to_string()));
        }

        let subscription_id = input
            .subscription_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        if input.plan.requires_subscription() && subscription_id.is_none() {
            return Err(AccessError::SubscriptionIdMissing);
        }

        let lifetime = self.config.ttl_for(input.plan).as_secs() as i64;
        let payload = AccessTokenPayload::new(
            input.plan,
            customer_id,
            subscription_id,
            self.clock.now_secs(),
            lifetime,
        );
        let token = self.signer.sign(&payload)?;

        tracing::info!(
            plan = %input.plan,
            customer_id = %payload.customer_id,
            exp = payload.exp,
            "Access token issued"
        );

        Ok(IssueAccessTokenOutput {
            token,
            payload,
            max_age_secs: lifetime,
        })
    }
}
