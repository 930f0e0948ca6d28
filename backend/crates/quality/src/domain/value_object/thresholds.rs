//! Quality Thresholds

use serde::{Deserialize, Serialize};

/// Gate thresholds
///
/// Lengths are counted in characters. Serialized camelCase for the
/// dashboard endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityThresholds {
    pub min_summary_length: usize,
    pub min_step_count: usize,
    pub min_block_count: usize,
    pub min_faq_count: usize,
    pub min_tag_count: usize,
    pub min_title_length: usize,
    pub max_title_length: usize,
    /// Minimum overall score (0-100) required to pass
    pub min_pass_score: u32,
    pub gold_min_score: u32,
    pub silver_min_score: u32,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_summary_length: 60,
            min_step_count: 3,
            min_block_count: 4,
            min_faq_count: 2,
            min_tag_count: 2,
            min_title_length: 8,
            max_title_length: 110,
            min_pass_score: 60,
            gold_min_score: 90,
            silver_min_score: 75,
        }
    }
}
