//! Security Check Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Assessment entity, target heuristic, assessor trait
//! - `application/` - The check pipeline use case and its configuration
//! - `infra/` - Heuristic assessor
//! - `presentation/` - HTTP handler, DTOs, router
//!
//! ## Pipeline
//! Every request runs, in order: body validation, deny-list check on the
//! access cookie, two-tier rate limiting (client IP, then verified customer),
//! a response-cache lookup, and the assessment behind a circuit breaker.
//! Fresh results are cached for an hour. The heuristic never touches the
//! network; it is a deterministic function of the target.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::SecurityCheckConfig;
pub use error::{CheckError, CheckResult};
pub use infra::HeuristicAssessor;
pub use presentation::{SecurityCheckAppState, security_check_router};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::presentation::dto::*;
}
