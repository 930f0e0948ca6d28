//! Infrastructure Layer
//!
//! Assessor implementations.

pub mod heuristic;

pub use heuristic::HeuristicAssessor;
