use serde::{Deserialize, Serialize};
use std::fmt;

/// Paid plan carried in an access token
///
/// Daypass tokens are self-sufficient until `exp`. Subscription plans
/// (`pro`, `team`) are re-checked against the subscription source on access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessPlan {
    Daypass,
    Pro,
    Team,
}

impl AccessPlan {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use AccessPlan::*;
        match self {
            Daypass => "daypass",
            Pro => "pro",
            Team => "team",
        }
    }

    #[inline]
    pub const fn requires_subscription(&self) -> bool {
        matches!(self, AccessPlan::Pro | AccessPlan::Team)
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use AccessPlan::*;
        match code.trim().to_ascii_lowercase().as_str() {
            "daypass" => Some(Daypass),
            "pro" => Some(Pro),
            "team" => Some(Team),
            _ => None,
        }
    }
}

impl fmt::Display for AccessPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
