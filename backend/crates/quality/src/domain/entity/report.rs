//! Quality Reports
//!
//! Per-record reports and the aggregates derived from them.

use serde::Serialize;

use crate::domain::value_object::{CertifiedTier, QualityThresholds, Severity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityViolation {
    pub field: &'static str,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub slug: String,
    pub pass: bool,
    /// 0-100
    pub score: u32,
    pub violations: Vec<QualityViolation>,
    pub certified_tier: CertifiedTier,
}

impl QualityReport {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity.is_error())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCount {
    pub field: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub avg_score: u32,
    /// Percent, rounded
    pub pass_rate: u32,
    pub gold_count: usize,
    pub silver_count: usize,
    pub hidden_count: usize,
    pub top_violations: Vec<FieldCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoImprove {
    pub eligible: usize,
    pub threshold: u32,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityDashboard {
    #[serde(flatten)]
    pub stats: QualityStats,
    pub auto_improve: AutoImprove,
    pub thresholds: QualityThresholds,
}
