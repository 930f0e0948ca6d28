//! Application Configuration
//!
//! Limits and names for the security-check route.

use std::time::Duration;

use platform::circuit_breaker::CircuitBreakerOptions;
use platform::config::env_parse;
use platform::payload::{FieldSchema, FieldType, PayloadRules};
use platform::rate_limit::RateLimitConfig;

/// Security-check configuration
#[derive(Debug, Clone)]
pub struct SecurityCheckConfig {
    /// Raw body budget in bytes
    pub max_body_bytes: usize,
    /// Longest accepted target (a full DNS name)
    pub max_target_length: usize,
    /// Per-route limits applied through the shared limiter
    pub rate_limit: RateLimitConfig,
    /// Registry name of the breaker guarding the assessment
    pub breaker_name: String,
    pub breaker: CircuitBreakerOptions,
    pub cache_prefix: String,
    pub cache_ttl: Duration,
    /// Cookie carrying the access token
    pub access_cookie_name: String,
}

impl Default for SecurityCheckConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 8_192,
            max_target_length: 253,
            rate_limit: RateLimitConfig::new(30, 100),
            breaker_name: "security-check".to_string(),
            breaker: CircuitBreakerOptions::new(5, Duration::from_secs(30)),
            cache_prefix: "security-check".to_string(),
            cache_ttl: Duration::from_secs(3600),
            access_cookie_name: "claw_access".to_string(),
        }
    }
}

impl SecurityCheckConfig {
    /// Defaults overridden by `SECURITY_CHECK_*` variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            rate_limit: RateLimitConfig::new(
                env_parse(
                    "SECURITY_CHECK_SOFT_LIMIT",
                    defaults.rate_limit.soft_limit_per_minute,
                ),
                env_parse(
                    "SECURITY_CHECK_HARD_LIMIT",
                    defaults.rate_limit.hard_limit_per_minute,
                ),
            ),
            cache_ttl: Duration::from_secs(env_parse(
                "SECURITY_CHECK_CACHE_TTL_SECS",
                defaults.cache_ttl.as_secs(),
            )),
            ..defaults
        }
    }

    /// Body rules: one required `target` string.
    pub fn payload_rules(&self) -> PayloadRules {
        PayloadRules {
            max_bytes: self.max_body_bytes,
            fields: vec![
                FieldSchema::required("target", FieldType::String)
                    .max_length(self.max_target_length),
            ],
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SecurityCheckConfig::default();
        assert_eq!(config.rate_limit.soft_limit_per_minute, 30);
        assert_eq!(config.rate_limit.hard_limit_per_minute, 100);
        assert_eq!(config.breaker.failure_threshold, 5);
        assert_eq!(config.breaker.recovery_timeout, Duration::from_secs(30));
        assert_eq!(config.cache_ttl.as_secs(), 3600);

        let rules = config.payload_rules();
        assert_eq!(rules.max_bytes, 8_192);
        assert_eq!(rules.max_depth, 8);
        assert!(rules.scan_injections);
        assert_eq!(rules.fields[0].max_length, Some(253));
    }
}
