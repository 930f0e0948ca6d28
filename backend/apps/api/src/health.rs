//! Health Endpoint
//!
//! Snapshot of the in-memory protection state: breaker statuses, cache
//! size, deny-list size and live rate-limit buckets.

use std::sync::Arc;

use access::domain::RevocationStore;
use access::infra::InMemoryRevocationStore;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use platform::cache::ResponseCache;
use platform::circuit_breaker::{CircuitBreakerRegistry, CircuitStatus};
use platform::clock::SharedClock;
use platform::rate_limit::RateLimiter;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    pub breakers: &'static CircuitBreakerRegistry,
    pub cache: Arc<ResponseCache>,
    pub revocations: Arc<InMemoryRevocationStore>,
    pub limiter: Arc<RateLimiter>,
    pub clock: SharedClock,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub circuit_breakers: Vec<CircuitStatus>,
    pub cache_entries: usize,
    pub denied_tokens: usize,
    pub rate_limit_buckets: usize,
}

/// GET /api/health
pub async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    let denied_tokens = state.revocations.len().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Deny-list size unavailable");
        0
    });

    Json(HealthResponse {
        status: "ok",
        timestamp: state.clock.now_iso(),
        circuit_breakers: state.breakers.list(),
        cache_entries: state.cache.len(),
        denied_tokens,
        rate_limit_buckets: state.limiter.bucket_count(),
    })
}

pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
}
