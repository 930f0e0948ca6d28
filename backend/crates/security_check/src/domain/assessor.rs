//! Assessor Trait
//!
//! The protected operation behind the circuit breaker. The default
//! implementation is the local heuristic; a real scanner would plug in here.

use crate::domain::entity::SecurityAssessment;
use crate::error::CheckResult;

#[trait_variant::make(TargetAssessor: Send)]
pub trait LocalTargetAssessor {
    /// Assess a trimmed, validated target.
    async fn assess(&self, target: &str) -> CheckResult<SecurityAssessment>;
}
