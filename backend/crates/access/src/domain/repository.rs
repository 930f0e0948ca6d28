//! Store Traits
//!
//! Interfaces for revocation state and subscription lookups. In-memory and
//! HTTP implementations live in the infrastructure layer.

use crate::domain::entity::CheckoutSession;
use crate::domain::value_object::SubscriptionStatus;
use crate::error::AccessResult;

/// Revoked-token registry
///
/// Entries are keyed by [`TokenId`](crate::domain::value_object::TokenId)
/// and only matter until the token's own `exp` (Unix seconds).
#[trait_variant::make(RevocationStore: Send)]
pub trait LocalRevocationStore {
    /// Revoke `token` until `exp`. Expired entries are pruned first.
    async fn deny(&self, token: &str, exp: i64, reason: Option<&str>) -> AccessResult<()>;

    /// True while an entry exists and its `exp` is in the future.
    async fn is_denied(&self, token: &str) -> AccessResult<bool>;

    /// Drop entries whose `exp` has passed. Returns the number removed.
    async fn prune_expired(&self) -> AccessResult<usize>;

    /// Entries currently held.
    async fn len(&self) -> AccessResult<usize>;
}

/// Billing provider: subscription state and completed checkouts
#[trait_variant::make(SubscriptionSource: Send)]
pub trait LocalSubscriptionSource {
    async fn subscription_status(&self, subscription_id: &str) -> AccessResult<SubscriptionStatus>;

    /// Checkout session behind a purchase redirect.
    async fn checkout_session(&self, session_id: &str) -> AccessResult<CheckoutSession>;
}
