//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod export;
pub mod get_report;
pub mod overview;

// Re-exports
pub use config::QualityConfig;
pub use export::ExportRunbooksUseCase;
pub use get_report::{GetQualityReportUseCase, QualityReportOutput};
pub use overview::QualityOverviewUseCase;
