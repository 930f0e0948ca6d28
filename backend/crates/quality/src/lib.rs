//! Quality (Content Quality Gate) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Runbook records, thresholds, scoring services
//! - `application/` - Report, overview and export use cases
//! - `infra/` - In-memory catalog loaded from JSON
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Scoring is a pure function of record and thresholds: every runbook starts
//! at 100, loses a fixed penalty per violated rule, and passes only without
//! error-severity violations.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::QualityConfig;
pub use domain::services::{
    compute_quality_dashboard, compute_quality_stats, filter_quality_runbooks, revalidate_seconds,
    validate_runbook,
};
pub use error::{QualityError, QualityResult};
pub use infra::InMemoryRunbookCatalog;
pub use presentation::QualityAppState;
pub use presentation::router::{quality_router, runbook_export_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
