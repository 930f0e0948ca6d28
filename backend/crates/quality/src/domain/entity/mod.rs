//! Entity Module

pub mod report;
pub mod runbook;

pub use report::{AutoImprove, FieldCount, QualityDashboard, QualityReport, QualityStats, QualityViolation};
pub use runbook::{CalloutTone, FaqEntry, HowTo, Runbook, RunbookAuthor, RunbookBlock};
