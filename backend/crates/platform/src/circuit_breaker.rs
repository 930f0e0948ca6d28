//! Circuit Breaker
//!
//! Per-dependency failure tracking with three states:
//! - `CLOSED`: calls pass; consecutive failures are counted
//! - `OPEN`: calls are rejected until the recovery timeout elapses
//! - `HALF_OPEN`: probe calls pass; enough successes close the circuit,
//!   any failure reopens it
//!
//! Breakers are looked up by name in a [`CircuitBreakerRegistry`]. The first
//! lookup creates the breaker; later lookups ignore their options.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::clock::{SharedClock, SystemClock};

/// Breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "CLOSED",
            CircuitState::Open => "OPEN",
            CircuitState::HalfOpen => "HALF_OPEN",
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds for a single breaker
#[derive(Debug, Clone)]
pub struct CircuitBreakerOptions {
    /// Consecutive failures in CLOSED before opening
    pub failure_threshold: u32,
    /// Time spent OPEN before a probe is allowed
    pub recovery_timeout: Duration,
    /// Consecutive successes in HALF_OPEN before closing
    pub success_threshold: u32,
}

impl Default for CircuitBreakerOptions {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 2,
        }
    }
}

impl CircuitBreakerOptions {
    pub fn new(failure_threshold: u32, recovery_timeout: Duration) -> Self {
        Self {
            failure_threshold,
            recovery_timeout,
            ..Default::default()
        }
    }

    fn recovery_timeout_ms(&self) -> i64 {
        self.recovery_timeout.as_millis() as i64
    }
}

/// Serializable snapshot for health endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitStatus {
    pub name: String,
    pub state: CircuitState,
    pub failures: u32,
    /// Unix ms of the last opening, `None` when never opened or reset
    pub opened_at: Option<i64>,
}

/// Outcome of [`CircuitBreaker::run`]
#[derive(Debug, Error)]
pub enum CircuitError<E> {
    /// The breaker rejected the call without running it
    #[error("circuit '{name}' is {state}, call rejected")]
    Open { name: String, state: CircuitState },
    /// The operation ran and failed
    #[error(transparent)]
    Inner(E),
}

impl<E> CircuitError<E> {
    pub fn is_open(&self) -> bool {
        matches!(self, CircuitError::Open { .. })
    }

    pub fn into_inner(self) -> Option<E> {
        match self {
            CircuitError::Inner(err) => Some(err),
            CircuitError::Open { .. } => None,
        }
    }
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    failures: u32,
    successes: u32,
    opened_at_ms: i64,
}

impl BreakerState {
    fn closed() -> Self {
        Self {
            state: CircuitState::Closed,
            failures: 0,
            successes: 0,
            opened_at_ms: 0,
        }
    }

    fn open(&mut self, now_ms: i64) {
        self.state = CircuitState::Open;
        self.opened_at_ms = now_ms;
        self.successes = 0;
    }
}

/// A single named breaker
pub struct CircuitBreaker {
    name: String,
    options: CircuitBreakerOptions,
    clock: SharedClock,
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    /// Thresholds below 1 are raised to 1.
    pub fn new(name: impl Into<String>, options: CircuitBreakerOptions, clock: SharedClock) -> Self {
        let options = CircuitBreakerOptions {
            failure_threshold: options.failure_threshold.max(1),
            success_threshold: options.success_threshold.max(1),
            ..options
        };
        Self {
            name: name.into(),
            options,
            clock,
            inner: Mutex::new(BreakerState::closed()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &CircuitBreakerOptions {
        &self.options
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    /// Whether the next call may proceed.
    ///
    /// Moves OPEN to HALF_OPEN once the recovery timeout has elapsed.
    pub fn is_call_allowed(&self) -> bool {
        let now_ms = self.clock.now_ms();
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                if now_ms - inner.opened_at_ms >= self.options.recovery_timeout_ms() {
                    inner.state = CircuitState::HalfOpen;
                    inner.successes = 0;
                    tracing::info!(circuit = %self.name, "Circuit half-open, allowing probe");
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => inner.failures = 0,
            CircuitState::HalfOpen => {
                inner.successes += 1;
                if inner.successes >= self.options.success_threshold {
                    *inner = BreakerState::closed();
                    tracing::info!(circuit = %self.name, "Circuit closed after recovery");
                }
            }
            CircuitState::Open => {}
        }
    }

    pub fn record_failure(&self) {
        let now_ms = self.clock.now_ms();
        let mut inner = self.lock();
        match inner.state {
            CircuitState::HalfOpen => {
                inner.open(now_ms);
                tracing::warn!(circuit = %self.name, "Probe failed, circuit reopened");
            }
            // A failure reported while already OPEN restarts the recovery window.
            CircuitState::Closed | CircuitState::Open => {
                inner.failures = inner.failures.saturating_add(1);
                if inner.failures >= self.options.failure_threshold {
                    let was_closed = inner.state == CircuitState::Closed;
                    inner.open(now_ms);
                    if was_closed {
                        tracing::warn!(
                            circuit = %self.name,
                            failures = inner.failures,
                            "Circuit opened"
                        );
                    }
                }
            }
        }
    }

    /// Force the circuit OPEN.
    pub fn trip(&self) {
        let now_ms = self.clock.now_ms();
        self.lock().open(now_ms);
        tracing::warn!(circuit = %self.name, "Circuit tripped manually");
    }

    /// Force the circuit CLOSED and clear all counters.
    pub fn reset(&self) {
        *self.lock() = BreakerState::closed();
        tracing::info!(circuit = %self.name, "Circuit reset");
    }

    pub fn status(&self) -> CircuitStatus {
        let inner = self.lock();
        CircuitStatus {
            name: self.name.clone(),
            state: inner.state,
            failures: inner.failures,
            opened_at: (inner.opened_at_ms > 0).then_some(inner.opened_at_ms),
        }
    }

    /// Run `operation` under this breaker.
    ///
    /// Rejects with [`CircuitError::Open`] when calls are not allowed, otherwise
    /// awaits the operation and records its outcome. No retries, no timeout.
    pub async fn run<F, Fut, T, E>(&self, operation: F) -> Result<T, CircuitError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.is_call_allowed() {
            return Err(CircuitError::Open {
                name: self.name.clone(),
                state: self.state(),
            });
        }

        match operation().await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(err) => {
                self.record_failure();
                Err(CircuitError::Inner(err))
            }
        }
    }
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("state", &*self.lock())
            .finish()
    }
}

/// Name-keyed breaker registry
pub struct CircuitBreakerRegistry {
    clock: SharedClock,
    breakers: Mutex<HashMap<String, Arc<CircuitBreaker>>>,
}

static GLOBAL_REGISTRY: LazyLock<CircuitBreakerRegistry> =
    LazyLock::new(|| CircuitBreakerRegistry::new(SystemClock::shared()));

impl CircuitBreakerRegistry {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            breakers: Mutex::new(HashMap::new()),
        }
    }

    /// Process-wide registry on the system clock.
    pub fn global() -> &'static CircuitBreakerRegistry {
        &GLOBAL_REGISTRY
    }

    /// Get or create a breaker. `options` only apply on creation.
    pub fn get(&self, name: &str, options: Option<CircuitBreakerOptions>) -> Arc<CircuitBreaker> {
        let mut breakers = self.breakers.lock().unwrap_or_else(PoisonError::into_inner);
        breakers
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(circuit = %name, "Registering circuit breaker");
                Arc::new(CircuitBreaker::new(
                    name,
                    options.unwrap_or_default(),
                    self.clock.clone(),
                ))
            })
            .clone()
    }

    /// Status of every breaker, sorted by name.
    pub fn list(&self) -> Vec<CircuitStatus> {
        let breakers: Vec<Arc<CircuitBreaker>> = self
            .breakers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        let mut statuses: Vec<CircuitStatus> = breakers.iter().map(|b| b.status()).collect();
        statuses.sort_by(|a, b| a.name.cmp(&b.name));
        statuses
    }

    pub fn len(&self) -> usize {
        self.breakers.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Get or create a breaker in the process-wide registry.
pub fn get_circuit_breaker(name: &str, options: Option<CircuitBreakerOptions>) -> Arc<CircuitBreaker> {
    CircuitBreakerRegistry::global().get(name, options)
}

/// Status of every breaker in the process-wide registry.
pub fn list_circuit_breakers() -> Vec<CircuitStatus> {
    CircuitBreakerRegistry::global().list()
}
