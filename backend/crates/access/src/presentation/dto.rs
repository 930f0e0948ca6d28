//! Data Transfer Objects

use serde::Deserialize;

/// Query of `GET /api/auth/recover`
#[derive(Debug, Default, Deserialize)]
pub struct RecoverQuery {
    #[serde(default)]
    pub token: Option<String>,
}

/// Query of `GET /api/auth/activate`
#[derive(Debug, Default, Deserialize)]
pub struct ActivateQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Site-relative redirect targets of the activation and recovery flows
pub mod redirect {
    pub const DASHBOARD: &str = "/dashboard";
    pub const RECOVER: &str = "/recover";
    pub const RECOVER_INVALID: &str = "/recover?invalid=1";
    pub const RECOVER_CHECK_FAILED: &str = "/recover?subscription_check_failed=1";
    pub const PRICING_INACTIVE: &str = "/pricing?subscription_inactive=1";
    pub const PRICING_MISSING_SESSION: &str = "/pricing?missing_session=1";
    pub const PRICING_NO_CUSTOMER: &str = "/pricing?no_customer=1";
    pub const PRICING_NO_SUBSCRIPTION: &str = "/pricing?no_subscription=1";
    pub const SUCCESS: &str = "/success";
}
