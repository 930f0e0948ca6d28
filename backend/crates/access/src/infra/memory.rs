//! In-Memory Stores
//!
//! Process-local implementations of the store traits. State is lost on
//! restart and not shared between instances.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use platform::clock::SharedClock;

use crate::domain::entity::CheckoutSession;
use crate::domain::repository::{RevocationStore, SubscriptionSource};
use crate::domain::value_object::{SubscriptionStatus, TokenId};
use crate::error::{AccessError, AccessResult};

#[derive(Debug, Clone)]
struct DenyEntry {
    exp: i64,
    reason: Option<String>,
}

/// In-memory deny-list keyed by [`TokenId`]
pub struct InMemoryRevocationStore {
    clock: SharedClock,
    entries: Mutex<HashMap<TokenId, DenyEntry>>,
}

impl InMemoryRevocationStore {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn prune_locked(entries: &mut HashMap<TokenId, DenyEntry>, now: i64) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| entry.exp > now);
        before - entries.len()
    }
}

impl RevocationStore for InMemoryRevocationStore {
    async fn deny(&self, token: &str, exp: i64, reason: Option<&str>) -> AccessResult<()> {
        let now = self.clock.now_secs();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Self::prune_locked(&mut entries, now);
        entries.insert(
            TokenId::from_token(token),
            DenyEntry {
                exp,
                reason: reason.map(str::to_string),
            },
        );
        Ok(())
    }

    async fn is_denied(&self, token: &str) -> AccessResult<bool> {
        let now = self.clock.now_secs();
        let id = TokenId::from_token(token);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(&id) {
            Some(entry) if entry.exp > now => {
                tracing::debug!(
                    token_id = %id,
                    reason = entry.reason.as_deref().unwrap_or("-"),
                    "Deny-list hit"
                );
                Ok(true)
            }
            Some(_) => {
                entries.remove(&id);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    async fn prune_expired(&self) -> AccessResult<usize> {
        let now = self.clock.now_secs();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = Self::prune_locked(&mut entries, now);
        if removed > 0 {
            tracing::debug!(removed, "Pruned expired deny-list entries");
        }
        Ok(removed)
    }

    async fn len(&self) -> AccessResult<usize> {
        Ok(self.entries.lock().unwrap_or_else(PoisonError::into_inner).len())
    }
}

/// Fixed subscription and checkout tables, for tests and offline development
#[derive(Default)]
pub struct StaticSubscriptionSource {
    statuses: Mutex<HashMap<String, SubscriptionStatus>>,
    sessions: Mutex<HashMap<String, CheckoutSession>>,
}

impl StaticSubscriptionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, subscription_id: impl Into<String>, status: SubscriptionStatus) -> Self {
        self.set(subscription_id, status);
        self
    }

    pub fn set(&self, subscription_id: impl Into<String>, status: SubscriptionStatus) {
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(subscription_id.into(), status);
    }

    pub fn with_session(self, session_id: impl Into<String>, session: CheckoutSession) -> Self {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_id.into(), session);
        self
    }
}

impl SubscriptionSource for StaticSubscriptionSource {
    async fn subscription_status(&self, subscription_id: &str) -> AccessResult<SubscriptionStatus> {
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(subscription_id)
            .copied()
            .ok_or_else(|| AccessError::SubscriptionSource(format!("No such subscription: {subscription_id}")))
    }

    async fn checkout_session(&self, session_id: &str) -> AccessResult<CheckoutSession> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .cloned()
            .ok_or_else(|| AccessError::SubscriptionSource(format!("No such checkout session: {session_id}")))
    }
}
