//! Target Heuristic
//!
//! Deterministic risk estimate for an IP or domain. No network traffic is
//! generated: the verdict is derived from a stable hash of the target so the
//! same input always yields the same answer.

use platform::clock::to_iso8601;

use crate::domain::entity::SecurityAssessment;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// Share of public targets reported as vulnerable, in percent.
const VULNERABLE_PERCENT: u32 = 28;
const VULNERABLE_BASE_SCORE: i32 = 35;
const SAFE_BASE_SCORE: i32 = 84;
const MIN_SCORE: i32 = 5;
const MAX_SCORE: i32 = 99;

const LOCAL_PREFIXES: &[&str] = &["127.", "10.", "192.168.", "172.16."];

const VULNERABLE_DETAILS: &[&str] = &[
    "Public exposure likely (gateway or ports not bound privately)",
    "Missing origin and token discipline is a common attack vector",
    "Secret rotation and a firewall baseline are strongly recommended",
];

const SAFE_DETAILS: &[&str] = &[
    "No obvious high-risk signals in the heuristic",
    "Recommendation: apply baseline hardening anyway (private subnet, rotation, monitoring)",
];

const VULNERABLE_RECOMMENDATIONS: &[&str] = &[
    "IMMEDIATELY: rotate keys (OpenAI, Anthropic, Telegram, etc.)",
    "Close the exposure: private subnet plus VPN or tunnel, firewall deny-by-default",
    "Preserve logs (ingress, auth failures) before cleaning up",
    "WebSocket origin allowlist and short token TTL",
];

const SAFE_RECOMMENDATIONS: &[&str] = &[
    "Private networking as the default",
    "Enable monitoring and auth-failure alerts",
    "Regular updates with a rollback plan",
    "Backups and a tested restore",
];

pub const DISCLAIMER: &str = "Note: this is a heuristic risk check, not a port scan or an audit. \
For reliable results, review logs and configuration or commission a professional audit.";

/// 32-bit FNV-1a over the UTF-16 code units of `input`.
///
/// ```rust
/// use security_check::domain::fnv1a;
///
/// assert_eq!(fnv1a(""), 0x811c_9dc5);
/// assert_eq!(fnv1a("a"), 0xe40c_292c);
/// ```
pub fn fnv1a(input: &str) -> u32 {
    input.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Loopback and common private ranges. Local targets are never vulnerable.
pub fn looks_local(target: &str) -> bool {
    let target = target.trim().to_lowercase();
    target.contains("localhost") || LOCAL_PREFIXES.iter().any(|p| target.starts_with(p))
}

/// Outcome of the heuristic before it is rendered into an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub vulnerable: bool,
    pub score: u32,
}

/// Score a target.
///
/// The jitter shifts the hash as a signed 32-bit value and keeps the sign of
/// the remainder, so it ranges over `-33..=11`.
pub fn score_target(target: &str) -> Verdict {
    let hash = fnv1a(target);
    let vulnerable = !looks_local(target) && hash % 100 < VULNERABLE_PERCENT;

    let base = if vulnerable {
        VULNERABLE_BASE_SCORE
    } else {
        SAFE_BASE_SCORE
    };
    let jitter = ((hash as i32) >> 8) % 23 - 11;
    let score = (base + jitter).clamp(MIN_SCORE, MAX_SCORE) as u32;

    Verdict { vulnerable, score }
}

fn to_strings(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

/// Full assessment for `target` at `now_ms`.
pub fn assess(target: &str, now_ms: i64) -> SecurityAssessment {
    let Verdict { vulnerable, score } = score_target(target);

    let (message, details, recommendations) = if vulnerable {
        (
            format!(
                "Elevated risk: \"{target}\" looks like a publicly reachable instance. \
Priority: rotate keys and close the exposure."
            ),
            VULNERABLE_DETAILS,
            VULNERABLE_RECOMMENDATIONS,
        )
    } else {
        (
            format!(
                "Looks okay: \"{target}\" shows no critical high-risk patterns in the heuristic. \
Baseline hardening is still worth it."
            ),
            SAFE_DETAILS,
            SAFE_RECOMMENDATIONS,
        )
    };

    SecurityAssessment {
        timestamp: to_iso8601(now_ms),
        target: target.to_string(),
        vulnerable,
        score,
        message,
        details: to_strings(details),
        recommendations: to_strings(recommendations),
        disclaimer: DISCLAIMER.to_string(),
    }
}
