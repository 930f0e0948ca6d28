//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::domain::entity::{QualityDashboard, QualityReport, QualityStats};
use crate::domain::value_object::QualityThresholds;

/// Query of `GET /api/quality-gate`
#[derive(Debug, Default, Deserialize)]
pub struct QualityGateQuery {
    #[serde(default)]
    pub slug: Option<String>,
}

/// Single-runbook report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReportResponse {
    #[serde(flatten)]
    pub report: QualityReport,
    pub revalidate_seconds: u64,
}

/// Catalog-wide statistics
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityStatsResponse {
    #[serde(flatten)]
    pub stats: QualityStats,
    pub thresholds: QualityThresholds,
    pub generated_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityDashboardResponse {
    #[serde(flatten)]
    pub dashboard: QualityDashboard,
    pub generated_at: String,
}
