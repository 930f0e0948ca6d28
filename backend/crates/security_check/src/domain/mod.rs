//! Domain Layer
//!
//! Contains the assessment entity, the target heuristic and the assessor
//! trait.

pub mod assessor;
pub mod entity;
pub mod services;

// Re-exports
pub use assessor::TargetAssessor;
pub use entity::SecurityAssessment;
pub use services::{Verdict, assess, fnv1a, looks_local, score_target};
