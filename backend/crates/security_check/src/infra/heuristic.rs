//! Heuristic Assessor
//!
//! Runs the local hash heuristic. Never fails; it sits behind the breaker so
//! a real scanner can replace it without touching the pipeline.

use platform::clock::SharedClock;

use crate::domain::assessor::TargetAssessor;
use crate::domain::entity::SecurityAssessment;
use crate::domain::services::assess;
use crate::error::CheckResult;

#[derive(Clone)]
pub struct HeuristicAssessor {
    clock: SharedClock,
}

impl HeuristicAssessor {
    pub fn new(clock: SharedClock) -> Self {
        Self { clock }
    }
}

impl TargetAssessor for HeuristicAssessor {
    async fn assess(&self, target: &str) -> CheckResult<SecurityAssessment> {
        Ok(assess(target, self.clock.now_ms()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::clock::ManualClock;

    #[tokio::test]
    async fn test_stamps_with_injected_clock() {
        let assessor = HeuristicAssessor::new(ManualClock::shared(0));
        let assessment = assessor.assess("example.com").await.unwrap();
        assert_eq!(assessment.timestamp, "1970-01-01T00:00:00.000Z");
        assert_eq!(assessment.score, 75);
    }
}
