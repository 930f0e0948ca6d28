//! HTTP Handlers

use std::sync::Arc;

use access::application::SharedSigner;
use access::domain::RevocationStore;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use platform::cache::ResponseCache;
use platform::circuit_breaker::CircuitBreaker;
use platform::client::ClientIp;
use platform::cookie::extract_cookie;
use platform::rate_limit::RateLimiter;

use crate::application::config::SecurityCheckConfig;
use crate::application::{CheckTargetInput, CheckTargetUseCase};
use crate::domain::assessor::TargetAssessor;
use crate::error::CheckResult;
use crate::presentation::dto::SecurityCheckResponse;
use crate::presentation::dto::headers::{X_RATELIMIT_REMAINING, X_RATELIMIT_RESET};

/// Shared state for the security-check handler
///
/// Limiter, cache and breaker are usually shared with the rest of the
/// service; the breaker normally comes from the process-wide registry.
pub struct SecurityCheckAppState<R, A>
where
    R: RevocationStore + Send + Sync + 'static,
    A: TargetAssessor + Send + Sync + 'static,
{
    pub revocations: Arc<R>,
    pub signer: SharedSigner,
    pub assessor: Arc<A>,
    pub limiter: Arc<RateLimiter>,
    pub cache: Arc<ResponseCache>,
    pub breaker: Arc<CircuitBreaker>,
    pub config: Arc<SecurityCheckConfig>,
}

impl<R, A> Clone for SecurityCheckAppState<R, A>
where
    R: RevocationStore + Send + Sync + 'static,
    A: TargetAssessor + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            revocations: self.revocations.clone(),
            signer: self.signer.clone(),
            assessor: self.assessor.clone(),
            limiter: self.limiter.clone(),
            cache: self.cache.clone(),
            breaker: self.breaker.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R, A> SecurityCheckAppState<R, A>
where
    R: RevocationStore + Send + Sync + 'static,
    A: TargetAssessor + Send + Sync + 'static,
{
    pub fn check_target(&self) -> CheckTargetUseCase<R, A> {
        CheckTargetUseCase::new(
            self.revocations.clone(),
            self.signer.clone(),
            self.assessor.clone(),
            self.limiter.clone(),
            self.cache.clone(),
            self.breaker.clone(),
            self.config.clone(),
        )
    }
}

/// POST /api/security-check
pub async fn check_target<R, A>(
    State(state): State<SecurityCheckAppState<R, A>>,
    client_ip: ClientIp,
    headers: HeaderMap,
    body: Bytes,
) -> CheckResult<Response>
where
    R: RevocationStore + Send + Sync + 'static,
    A: TargetAssessor + Send + Sync + 'static,
{
    let token = extract_cookie(&headers, &state.config.access_cookie_name);

    let output = state
        .check_target()
        .execute(CheckTargetInput {
            body: &body,
            client_ip: client_ip.as_str(),
            access_token: token.as_deref(),
        })
        .await?;

    let mut response = Json(SecurityCheckResponse {
        assessment: output.assessment,
        from_cache: output.from_cache,
    })
    .into_response();

    let headers = response.headers_mut();
    headers.insert(
        X_RATELIMIT_REMAINING,
        HeaderValue::from(output.rate_limit.remaining),
    );
    headers.insert(
        X_RATELIMIT_RESET,
        HeaderValue::from(output.rate_limit.reset_at_secs()),
    );

    Ok(response)
}
