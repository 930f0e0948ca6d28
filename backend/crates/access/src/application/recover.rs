//! Recover Access Use Case
//!
//! Redeems a recovery link: the token from the link is checked like a cookie
//! and, when it still grants access, is installed as the access cookie.

use std::sync::Arc;

use platform::clock::SharedClock;

use crate::application::check_access::CheckAccessUseCase;
use crate::application::config::AccessConfig;
use crate::application::token::SharedSigner;
use crate::domain::entity::AccessGrant;
use crate::domain::repository::{RevocationStore, SubscriptionSource};
use crate::error::AccessResult;

/// Recover output
#[derive(Debug, Clone)]
pub struct RecoverAccessOutput {
    pub grant: AccessGrant,
    /// `max(min_cookie_max_age, exp - now)`
    pub max_age_secs: i64,
}

/// Recover access use case
pub struct RecoverAccessUseCase<R, S>
where
    R: RevocationStore + Send + Sync + 'static,
    S: SubscriptionSource + Send + Sync + 'static,
{
    check: CheckAccessUseCase<R, S>,
    config: Arc<AccessConfig>,
    clock: SharedClock,
}

impl<R, S> RecoverAccessUseCase<R, S>
where
    R: RevocationStore + Send + Sync + 'static,
    S: SubscriptionSource + Send + Sync + 'static,
{
    pub fn new(
        revocations: Arc<R>,
        subscriptions: Arc<S>,
        signer: SharedSigner,
        config: Arc<AccessConfig>,
        clock: SharedClock,
    ) -> Self {
        Self {
            check: CheckAccessUseCase::new(revocations, subscriptions, signer),
            config,
            clock,
        }
    }

    pub async fn execute(&self, token: &str) -> AccessResult<RecoverAccessOutput> {
        let grant = self.check.execute(Some(token.trim())).await?;

        let min_age = self.config.min_cookie_max_age.as_secs() as i64;
        let max_age_secs = (grant.exp - self.clock.now_secs()).max(min_age);

        tracing::info!(
            plan = %grant.plan,
            customer_id = %grant.customer_id,
            "Access recovered"
        );

        Ok(RecoverAccessOutput {
            grant,
            max_age_secs,
        })
    }
}
