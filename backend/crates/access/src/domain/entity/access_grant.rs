//! Access Grant
//!
//! Outcome of a successful access check, plus the serializable summary
//! returned by the status endpoint.

use serde::Serialize;

use crate::domain::entity::access_token::AccessTokenPayload;
use crate::domain::value_object::AccessPlan;

/// Granted access, inserted into request extensions by the middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub plan: AccessPlan,
    pub customer_id: String,
    pub subscription_id: Option<String>,
    pub exp: i64,
}

impl From<AccessTokenPayload> for AccessGrant {
    fn from(payload: AccessTokenPayload) -> Self {
        Self {
            plan: payload.plan,
            customer_id: payload.customer_id,
            subscription_id: payload.subscription_id,
            exp: payload.exp,
        }
    }
}

/// Access summary: either a grant or a denial reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessInfo {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<AccessPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl AccessInfo {
    pub fn granted(grant: AccessGrant) -> Self {
        Self {
            ok: true,
            plan: Some(grant.plan),
            customer_id: Some(grant.customer_id),
            subscription_id: grant.subscription_id,
            exp: Some(grant.exp),
            reason: None,
        }
    }

    pub fn denied(reason: &'static str) -> Self {
        Self {
            ok: false,
            plan: None,
            customer_id: None,
            subscription_id: None,
            exp: None,
            reason: Some(reason),
        }
    }
}
