//! Assessment Entity

use serde::{Deserialize, Serialize};

/// Result of a heuristic exposure check
///
/// Stored in the response cache as-is, so it must round-trip through JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAssessment {
    /// RFC 3339 time the assessment was computed
    pub timestamp: String,
    pub target: String,
    pub vulnerable: bool,
    /// 5..=99, higher is safer
    pub score: u32,
    pub message: String,
    pub details: Vec<String>,
    pub recommendations: Vec<String>,
    pub disclaimer: String,
}
