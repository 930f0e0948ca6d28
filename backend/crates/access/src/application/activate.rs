//! Activate Access Use Case
//!
//! Turns a completed checkout into an access token.

use std::sync::Arc;

use platform::clock::SharedClock;

use crate::application::config::AccessConfig;
use crate::application::issue_token::{IssueAccessTokenInput, IssueAccessTokenUseCase};
use crate::application::token::SharedSigner;
use crate::domain::entity::AccessTokenPayload;
use crate::domain::repository::SubscriptionSource;
use crate::error::{AccessError, AccessResult};

#[derive(Debug, Clone)]
pub struct ActivateAccessOutput {
    pub token: String,
    pub payload: AccessTokenPayload,
    pub max_age_secs: i64,
}

pub struct ActivateAccessUseCase<S>
where
    S: SubscriptionSource + Send + Sync + 'static,
{
    subscriptions: Arc<S>,
    issue: IssueAccessTokenUseCase,
    config: Arc<AccessConfig>,
    clock: SharedClock,
}

impl<S> ActivateAccessUseCase<S>
where
    S: SubscriptionSource + Send + Sync + 'static,
{
    pub fn new(
        subscriptions: Arc<S>,
        signer: SharedSigner,
        config: Arc<AccessConfig>,
        clock: SharedClock,
    ) -> Self {
        Self {
            subscriptions,
            issue: IssueAccessTokenUseCase::new(signer, config.clone(), clock.clone()),
            config,
            clock,
        }
    }

    pub async fn execute(&self, session_id: &str) -> AccessResult<ActivateAccessOutput> {
        let session = self.subscriptions.checkout_session(session_id).await?;
        if !session.paid {
            return Err(AccessError::CheckoutIncomplete);
        }

        let plan = session.plan();
        let customer_id = session.customer_id.ok_or(AccessError::CustomerMissing)?;
        let subscription_id = if plan.requires_subscription() {
            Some(session.subscription_id.ok_or(AccessError::SubscriptionIdMissing)?)
        } else {
            None
        };

        let issued = self.issue.execute(IssueAccessTokenInput {
            plan,
            customer_id,
            subscription_id,
        })?;

        let min_age = self.config.min_cookie_max_age.as_secs() as i64;
        let max_age_secs = issued
            .payload
            .remaining_secs(self.clock.now_secs())
            .max(min_age);

        tracing::info!(session_id = %session_id, plan = %plan, "Checkout activated");

        Ok(ActivateAccessOutput {
            token: issued.token,
            payload: issued.payload,
            max_age_secs,
        })
    }
}
