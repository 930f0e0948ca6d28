//! Application Configuration
//!
//! Configuration for the Quality application layer.

use std::path::PathBuf;

use platform::config::env_string;

use crate::domain::value_object::QualityThresholds;

/// Quality application configuration
#[derive(Debug, Clone, Default)]
pub struct QualityConfig {
    pub thresholds: QualityThresholds,
    /// JSON array of runbook records (`RUNBOOKS_PATH`)
    pub runbooks_path: Option<PathBuf>,
}

impl QualityConfig {
    pub fn from_env() -> Self {
        Self {
            runbooks_path: env_string("RUNBOOKS_PATH").map(PathBuf::from),
            ..Default::default()
        }
    }
}
