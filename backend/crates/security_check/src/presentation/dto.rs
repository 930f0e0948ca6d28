//! Data Transfer Objects

use serde::Serialize;

use crate::domain::entity::SecurityAssessment;

/// Response body for POST /api/security-check
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityCheckResponse {
    #[serde(flatten)]
    pub assessment: SecurityAssessment,
    pub from_cache: bool,
}

pub mod headers {
    use axum::http::HeaderName;

    pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
    /// Unix seconds
    pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
}
