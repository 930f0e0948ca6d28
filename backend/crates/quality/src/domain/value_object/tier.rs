//! Certified Tier
//!
//! Badge shown next to a runbook. Only passing runbooks can earn one.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_object::QualityThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertifiedTier {
    Gold,
    Silver,
    Hidden,
}

impl CertifiedTier {
    /// Tier for a gate outcome
    pub fn classify(pass: bool, score: u32, thresholds: &QualityThresholds) -> Self {
        match (pass, score) {
            (true, s) if s >= thresholds.gold_min_score => Self::Gold,
            (true, s) if s >= thresholds.silver_min_score => Self::Silver,
            _ => Self::Hidden,
        }
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Hidden => "hidden",
        }
    }
}

impl fmt::Display for CertifiedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
