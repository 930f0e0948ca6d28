//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use platform::clock::SharedClock;

use crate::application::config::QualityConfig;
use crate::application::{ExportRunbooksUseCase, GetQualityReportUseCase, QualityOverviewUseCase};
use crate::domain::repository::RunbookCatalog;
use crate::error::QualityResult;
use crate::presentation::dto::{
    QualityDashboardResponse, QualityGateQuery, QualityReportResponse, QualityStatsResponse,
};

/// File name offered for the runbook export.
pub const EXPORT_FILENAME: &str = "clawguru-runbooks.json";

/// Shared state for quality handlers
pub struct QualityAppState<C>
where
    C: RunbookCatalog + Send + Sync + 'static,
{
    pub catalog: Arc<C>,
    pub config: Arc<QualityConfig>,
    pub clock: SharedClock,
}

impl<C> Clone for QualityAppState<C>
where
    C: RunbookCatalog + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            config: self.config.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<C> QualityAppState<C>
where
    C: RunbookCatalog + Send + Sync + 'static,
{
    pub fn new(catalog: Arc<C>, config: QualityConfig, clock: SharedClock) -> Self {
        Self {
            catalog,
            config: Arc::new(config),
            clock,
        }
    }
}

// ============================================================================
// Quality gate
// ============================================================================

/// GET /api/quality-gate[?slug=]
pub async fn quality_gate<C>(
    State(state): State<QualityAppState<C>>,
    Query(query): Query<QualityGateQuery>,
) -> QualityResult<Response>
where
    C: RunbookCatalog + Send + Sync + 'static,
{
    if let Some(slug) = query.slug.as_deref().filter(|s| !s.is_empty()) {
        let use_case = GetQualityReportUseCase::new(state.catalog.clone(), state.config.clone());
        let output = use_case.execute(slug).await?;
        return Ok(Json(QualityReportResponse {
            report: output.report,
            revalidate_seconds: output.revalidate_seconds,
        })
        .into_response());
    }

    let use_case = QualityOverviewUseCase::new(state.catalog.clone(), state.config.clone());
    let stats = use_case.stats().await?;
    Ok(Json(QualityStatsResponse {
        stats,
        thresholds: state.config.thresholds.clone(),
        generated_at: state.clock.now_iso(),
    })
    .into_response())
}

// ============================================================================
// Dashboard
// ============================================================================

/// GET /api/quality-dashboard
pub async fn quality_dashboard<C>(
    State(state): State<QualityAppState<C>>,
) -> QualityResult<Json<QualityDashboardResponse>>
where
    C: RunbookCatalog + Send + Sync + 'static,
{
    let use_case = QualityOverviewUseCase::new(state.catalog.clone(), state.config.clone());
    let dashboard = use_case.dashboard().await?;
    Ok(Json(QualityDashboardResponse {
        dashboard,
        generated_at: state.clock.now_iso(),
    }))
}

// ============================================================================
// Export (paid)
// ============================================================================

/// GET /api/download/runbooks
///
/// Mounted behind the access middleware.
pub async fn export_runbooks<C>(State(state): State<QualityAppState<C>>) -> QualityResult<Response>
where
    C: RunbookCatalog + Send + Sync + 'static,
{
    let use_case = ExportRunbooksUseCase::new(state.catalog.clone(), state.config.clone());
    let runbooks = use_case.execute().await?;

    Ok((
        [
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
            (header::CACHE_CONTROL, "private, no-store".to_string()),
        ],
        Json(runbooks),
    )
        .into_response())
}
