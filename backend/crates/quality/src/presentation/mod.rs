//! Presentation Layer
//!
//! HTTP handlers, DTOs, and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::QualityAppState;
pub use router::{quality_router, runbook_export_router};
