//! Check Target Use Case
//!
//! Validate body → deny-list → identity → rate limit → cache → breaker →
//! assessment → cache write.

use std::sync::Arc;

use access::application::SharedSigner;
use access::domain::RevocationStore;
use platform::cache::{ResponseCache, build_cache_key};
use platform::circuit_breaker::{CircuitBreaker, CircuitError};
use platform::payload::validate_payload;
use platform::rate_limit::{LimitTier, RateLimitResult, RateLimiter};
use serde_json::{Value, json};

use crate::application::config::SecurityCheckConfig;
use crate::domain::assessor::TargetAssessor;
use crate::domain::entity::SecurityAssessment;
use crate::error::{CheckError, CheckResult};

/// Input DTO for a security check
#[derive(Debug, Clone, Copy)]
pub struct CheckTargetInput<'a> {
    /// Raw request body
    pub body: &'a [u8],
    /// Resolved client IP, the hard-limit key
    pub client_ip: &'a str,
    /// Access cookie value, if any
    pub access_token: Option<&'a str>,
}

/// Output DTO for a security check
#[derive(Debug, Clone)]
pub struct CheckTargetOutput {
    pub assessment: SecurityAssessment,
    pub from_cache: bool,
    pub rate_limit: RateLimitResult,
}

/// Check Target Use Case
pub struct CheckTargetUseCase<R, A>
where
    R: RevocationStore,
    A: TargetAssessor,
{
    revocations: Arc<R>,
    signer: SharedSigner,
    assessor: Arc<A>,
    limiter: Arc<RateLimiter>,
    cache: Arc<ResponseCache>,
    breaker: Arc<CircuitBreaker>,
    config: Arc<SecurityCheckConfig>,
}

impl<R, A> CheckTargetUseCase<R, A>
where
    R: RevocationStore,
    A: TargetAssessor,
{
    pub fn new(
        revocations: Arc<R>,
        signer: SharedSigner,
        assessor: Arc<A>,
        limiter: Arc<RateLimiter>,
        cache: Arc<ResponseCache>,
        breaker: Arc<CircuitBreaker>,
        config: Arc<SecurityCheckConfig>,
    ) -> Self {
        Self {
            revocations,
            signer,
            assessor,
            limiter,
            cache,
            breaker,
            config,
        }
    }

    pub async fn execute(&self, input: CheckTargetInput<'_>) -> CheckResult<CheckTargetOutput> {
        let target = self.parse_target(input.body)?;

        let token = input.access_token.filter(|t| !t.is_empty());
        if let Some(token) = token
            && self.is_revoked(token).await
        {
            return Err(CheckError::TokenRevoked);
        }

        // Invalid tokens are treated as anonymous
        let identity = token
            .and_then(|t| self.signer.verify(t))
            .map(|payload| payload.customer_id);

        let rate_limit =
            self.limiter
                .check_with(input.client_ip, identity.as_deref(), &self.config.rate_limit);
        if !rate_limit.allowed {
            return Err(CheckError::RateLimited {
                tier: rate_limit.limited_by.unwrap_or(LimitTier::Hard),
                retry_after_secs: rate_limit.retry_after_secs(self.limiter.now_ms()),
                reset_at_secs: rate_limit.reset_at_secs(),
            });
        }

        let cache_key = build_cache_key(&self.config.cache_prefix, &json!({ "target": target }));
        if let Some(key) = &cache_key
            && let Some(assessment) = self.cache.get::<SecurityAssessment>(key)
        {
            tracing::debug!(target_host = %target, "Security check served from cache");
            return Ok(CheckTargetOutput {
                assessment,
                from_cache: true,
                rate_limit,
            });
        }

        let assessment = self
            .breaker
            .run(|| self.assessor.assess(&target))
            .await
            .map_err(|e| match e {
                CircuitError::Open { state, .. } => CheckError::CircuitOpen(state),
                CircuitError::Inner(err) => err,
            })?;

        if let Some(key) = cache_key
            && let Err(e) = self
                .cache
                .set(key, &assessment, self.config.cache_ttl.as_secs())
        {
            tracing::warn!(error = %e, "Failed to cache security check result");
        }

        tracing::info!(
            target_host = %target,
            vulnerable = assessment.vulnerable,
            score = assessment.score,
            "Security check completed"
        );

        Ok(CheckTargetOutput {
            assessment,
            from_cache: false,
            rate_limit,
        })
    }

    /// Validated, trimmed `target` from the raw body
    fn parse_target(&self, body: &[u8]) -> CheckResult<String> {
        let object = validate_payload(body, &self.config.payload_rules())?;
        let target = object
            .get("target")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        if target.is_empty() {
            return Err(CheckError::EmptyTarget);
        }
        Ok(target.to_string())
    }

    /// Deny-list lookup. A failing store refuses the token.
    async fn is_revoked(&self, token: &str) -> bool {
        match self.revocations.is_denied(token).await {
            Ok(denied) => denied,
            Err(e) => {
                tracing::error!(error = %e, "Deny-list lookup failed, refusing token");
                true
            }
        }
    }
}
