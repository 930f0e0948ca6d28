//! Quality Router

use axum::{Router, routing::get};

use crate::domain::repository::RunbookCatalog;
use crate::presentation::handlers::{self, QualityAppState};

/// Public quality endpoints (`/quality-gate`, `/quality-dashboard`)
pub fn quality_router<C>(state: QualityAppState<C>) -> Router
where
    C: RunbookCatalog + Send + Sync + 'static,
{
    Router::new()
        .route("/quality-gate", get(handlers::quality_gate::<C>))
        .route("/quality-dashboard", get(handlers::quality_dashboard::<C>))
        .with_state(state)
}

/// Paid export (`/runbooks`); the caller layers access control on top
pub fn runbook_export_router<C>(state: QualityAppState<C>) -> Router
where
    C: RunbookCatalog + Send + Sync + 'static,
{
    Router::new()
        .route("/runbooks", get(handlers::export_runbooks::<C>))
        .with_state(state)
}
