//! Revoke Token Use Case
//!
//! Logout: the presented token is denied until its own expiry.

use std::sync::Arc;

use crate::application::token::SharedSigner;
use crate::domain::repository::RevocationStore;
use crate::domain::value_object::TokenId;
use crate::error::{AccessError, AccessResult};

/// Reason recorded for self-service logouts.
pub const LOGOUT_REASON: &str = "logout";

/// Revoke token use case
pub struct RevokeTokenUseCase<R>
where
    R: RevocationStore + Send + Sync + 'static,
{
    revocations: Arc<R>,
    signer: SharedSigner,
}

impl<R> RevokeTokenUseCase<R>
where
    R: RevocationStore + Send + Sync + 'static,
{
    pub fn new(revocations: Arc<R>, signer: SharedSigner) -> Self {
        Self {
            revocations,
            signer,
        }
    }

    /// Deny `token` until its `exp`. Unverifiable tokens are refused.
    pub async fn execute(&self, token: &str, reason: Option<&str>) -> AccessResult<()> {
        let payload = self.signer.verify(token).ok_or(AccessError::TokenInvalid)?;
        self.revocations.deny(token, payload.exp, reason).await?;

        tracing::info!(
            token_id = %TokenId::from_token(token),
            customer_id = %payload.customer_id,
            reason = reason.unwrap_or("-"),
            "Access token revoked"
        );
        Ok(())
    }
}
