//! Platform Crate - Technical Infrastructure
//!
//! This crate provides the request-protection primitives and the shared
//! technical foundations they sit on:
//! - Injectable wall clock ([`clock`])
//! - Cryptographic utilities (SHA-256, HMAC-SHA256, base64url)
//! - Cookie management and client IP resolution
//! - Token-bucket rate limiting ([`rate_limit`])
//! - Circuit breakers with a process-wide registry ([`circuit_breaker`])
//! - TTL response cache with deterministic keys ([`cache`])
//! - Environment configuration helpers ([`config`])
//! - JSON body validation and injection screening ([`payload`])
//!
//! Every primitive is in-memory and per-process. Shared state is guarded by
//! `std::sync::Mutex`; no lock is ever held across an `.await`.

pub mod cache;
pub mod circuit_breaker;
pub mod client;
pub mod clock;
pub mod config;
pub mod cookie;
pub mod crypto;
pub mod payload;
pub mod rate_limit;

pub use cache::{CacheConfig, ResponseCache, build_cache_key};
pub use circuit_breaker::{
    CircuitBreaker, CircuitBreakerOptions, CircuitBreakerRegistry, CircuitError, CircuitState,
    CircuitStatus,
};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock, to_iso8601};
pub use payload::{FieldSchema, FieldType, PayloadError, PayloadRules, validate_payload};
pub use rate_limit::{LimitTier, RateLimitConfig, RateLimitResult, RateLimiter};
