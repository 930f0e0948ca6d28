//! Domain Layer
//!
//! Contains entities, value objects, scoring services, and catalog traits.

pub mod entity;
pub mod repository;
pub mod services;
pub mod value_object;

// Re-exports
pub use entity::{QualityDashboard, QualityReport, QualityStats, QualityViolation, Runbook};
pub use repository::RunbookCatalog;
pub use services::{
    compute_quality_dashboard, compute_quality_stats, filter_quality_runbooks, revalidate_seconds,
    validate_runbook,
};
pub use value_object::{CertifiedTier, QualityThresholds, Severity};
