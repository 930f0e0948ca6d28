//! Get Quality Report Use Case
//!
//! Scores one runbook from the catalog.

use std::sync::Arc;

use crate::application::config::QualityConfig;
use crate::domain::entity::QualityReport;
use crate::domain::repository::RunbookCatalog;
use crate::domain::services::{revalidate_seconds, validate_runbook};
use crate::error::{QualityError, QualityResult};

/// Report output
#[derive(Debug, Clone)]
pub struct QualityReportOutput {
    pub report: QualityReport,
    pub revalidate_seconds: u64,
}

/// Get quality report use case
pub struct GetQualityReportUseCase<C>
where
    C: RunbookCatalog + Send + Sync + 'static,
{
    catalog: Arc<C>,
    config: Arc<QualityConfig>,
}

impl<C> GetQualityReportUseCase<C>
where
    C: RunbookCatalog + Send + Sync + 'static,
{
    pub fn new(catalog: Arc<C>, config: Arc<QualityConfig>) -> Self {
        Self { catalog, config }
    }

    pub async fn execute(&self, slug: &str) -> QualityResult<QualityReportOutput> {
        let runbook = self
            .catalog
            .find(slug)
            .await?
            .ok_or_else(|| QualityError::RunbookNotFound(slug.to_string()))?;

        let thresholds = &self.config.thresholds;
        Ok(QualityReportOutput {
            report: validate_runbook(&runbook, thresholds),
            revalidate_seconds: revalidate_seconds(&runbook, thresholds),
        })
    }
}
