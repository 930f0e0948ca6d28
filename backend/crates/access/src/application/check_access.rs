//! Check Access Use Case
//!
//! Decides whether the bearer of an access cookie may use paid features.
//! Order: presence, signature and expiry, deny-list, then the plan rules.

use std::sync::Arc;

use crate::application::token::SharedSigner;
use crate::domain::entity::{AccessGrant, AccessInfo, AccessTokenPayload};
use crate::domain::repository::{RevocationStore, SubscriptionSource};
use crate::error::{AccessError, AccessResult};

/// Check access use case
pub struct CheckAccessUseCase<R, S>
where
    R: RevocationStore + Send + Sync + 'static,
    S: SubscriptionSource + Send + Sync + 'static,
{
    revocations: Arc<R>,
    subscriptions: Arc<S>,
    signer: SharedSigner,
}

impl<R, S> CheckAccessUseCase<R, S>
where
    R: RevocationStore + Send + Sync + 'static,
    S: SubscriptionSource + Send + Sync + 'static,
{
    pub fn new(revocations: Arc<R>, subscriptions: Arc<S>, signer: SharedSigner) -> Self {
        Self {
            revocations,
            subscriptions,
            signer,
        }
    }

    /// Grant for `token`, or the reason it was refused
    pub async fn execute(&self, token: Option<&str>) -> AccessResult<AccessGrant> {
        let token = token.filter(|t| !t.is_empty()).ok_or(AccessError::TokenMissing)?;
        let payload = self.verify_unrevoked(token).await?;

        if !payload.plan.requires_subscription() {
            return Ok(payload.into());
        }

        let subscription_id = payload
            .subscription_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(AccessError::SubscriptionIdMissing)?;

        let status = self.subscriptions.subscription_status(subscription_id).await?;
        if !status.grants_access() {
            tracing::info!(
                subscription_id = %subscription_id,
                status = %status,
                "Subscription does not grant access"
            );
            return Err(AccessError::SubscriptionInactive);
        }

        Ok(payload.into())
    }

    /// Serializable summary; faults are logged and reported by reason
    pub async fn info(&self, token: Option<&str>) -> AccessInfo {
        match self.execute(token).await {
            Ok(grant) => AccessInfo::granted(grant),
            Err(e) => {
                e.log();
                AccessInfo::denied(e.reason().unwrap_or("invalid_token"))
            }
        }
    }

    /// Verified payload that is not on the deny-list
    ///
    /// A deny-list failure refuses the token.
    pub async fn verify_unrevoked(&self, token: &str) -> AccessResult<AccessTokenPayload> {
        let payload = self.signer.verify(token).ok_or(AccessError::TokenInvalid)?;
        if self.is_revoked(token).await {
            return Err(AccessError::TokenRevoked);
        }
        Ok(payload)
    }

    /// Deny-list lookup that fails closed
    pub async fn is_revoked(&self, token: &str) -> bool {
        match self.revocations.is_denied(token).await {
            Ok(denied) => denied,
            Err(e) => {
                tracing::error!(error = %e, "Deny-list lookup failed, treating token as revoked");
                true
            }
        }
    }
}
