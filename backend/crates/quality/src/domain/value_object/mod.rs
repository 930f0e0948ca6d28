//! Value Object Module

pub mod severity;
pub mod thresholds;
pub mod tier;

pub use severity::Severity;
pub use thresholds::QualityThresholds;
pub use tier::CertifiedTier;
