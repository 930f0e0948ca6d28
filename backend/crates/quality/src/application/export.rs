//! Export Runbooks Use Case
//!
//! Paid download: every runbook that passes the gate.

use std::sync::Arc;

use crate::application::config::QualityConfig;
use crate::domain::entity::Runbook;
use crate::domain::repository::RunbookCatalog;
use crate::domain::services::filter_quality_runbooks;
use crate::error::QualityResult;

/// Export runbooks use case
pub struct ExportRunbooksUseCase<C>
where
    C: RunbookCatalog + Send + Sync + 'static,
{
    catalog: Arc<C>,
    config: Arc<QualityConfig>,
}

impl<C> ExportRunbooksUseCase<C>
where
    C: RunbookCatalog + Send + Sync + 'static,
{
    pub fn new(catalog: Arc<C>, config: Arc<QualityConfig>) -> Self {
        Self { catalog, config }
    }

    pub async fn execute(&self) -> QualityResult<Vec<Runbook>> {
        let runbooks = self.catalog.list().await?;
        let passing: Vec<Runbook> = filter_quality_runbooks(&runbooks, &self.config.thresholds)
            .into_iter()
            .cloned()
            .collect();

        tracing::info!(
            exported = passing.len(),
            total = runbooks.len(),
            "Runbook export prepared"
        );
        Ok(passing)
    }
}
