//! Access Token Payload
//!
//! The signed body of an access token. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::AccessPlan;

/// Only accepted payload version.
pub const TOKEN_VERSION: u8 = 1;

/// Access token payload
///
/// `iat` and `exp` are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenPayload {
    pub v: u8,
    pub plan: AccessPlan,
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl AccessTokenPayload {
    /// Build a current-version payload valid for `lifetime_secs` from `now_secs`.
    pub fn new(
        plan: AccessPlan,
        customer_id: impl Into<String>,
        subscription_id: Option<String>,
        now_secs: i64,
        lifetime_secs: i64,
    ) -> Self {
        Self {
            v: TOKEN_VERSION,
            plan,
            customer_id: customer_id.into(),
            subscription_id,
            iat: now_secs,
            exp: now_secs + lifetime_secs,
        }
    }

    /// Structural checks applied after the signature has been verified.
    pub fn is_well_formed(&self) -> bool {
        self.v == TOKEN_VERSION && self.exp != 0 && !self.customer_id.trim().is_empty()
    }

    /// Expired once `exp <= now`.
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        self.exp <= now_secs
    }

    /// Seconds left before expiry, never negative.
    pub fn remaining_secs(&self, now_secs: i64) -> i64 {
        (self.exp - now_secs).max(0)
    }
}
