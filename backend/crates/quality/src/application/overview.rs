//! Quality Overview Use Case
//!
//! Catalog-wide statistics and the dashboard summary.

use std::sync::Arc;

use crate::application::config::QualityConfig;
use crate::domain::entity::{QualityDashboard, QualityStats};
use crate::domain::repository::RunbookCatalog;
use crate::domain::services::{compute_quality_dashboard, compute_quality_stats};
use crate::error::QualityResult;

/// Quality overview use case
pub struct QualityOverviewUseCase<C>
where
    C: RunbookCatalog + Send + Sync + 'static,
{
    catalog: Arc<C>,
    config: Arc<QualityConfig>,
}

impl<C> QualityOverviewUseCase<C>
where
    C: RunbookCatalog + Send + Sync + 'static,
{
    pub fn new(catalog: Arc<C>, config: Arc<QualityConfig>) -> Self {
        Self { catalog, config }
    }

    pub async fn stats(&self) -> QualityResult<QualityStats> {
        let runbooks = self.catalog.list().await?;
        Ok(compute_quality_stats(&runbooks, &self.config.thresholds))
    }

    pub async fn dashboard(&self) -> QualityResult<QualityDashboard> {
        let runbooks = self.catalog.list().await?;
        let dashboard = compute_quality_dashboard(&runbooks, &self.config.thresholds);
        tracing::debug!(
            total = dashboard.stats.total,
            passed = dashboard.stats.passed,
            "Quality dashboard computed"
        );
        Ok(dashboard)
    }
}
