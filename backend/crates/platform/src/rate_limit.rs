//! Rate Limiting Infrastructure
//!
//! Two-tier token bucket limiter:
//! - hard limit per client IP (always applied, checked first)
//! - soft limit per authenticated identity (only when one is known)
//!
//! Buckets hold `capacity` tokens and refill continuously so that an empty
//! bucket is full again after one minute. A request consumes one token.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;

use crate::clock::SharedClock;

const REFILL_WINDOW_MS: f64 = 60_000.0;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Per-identity requests per minute
    pub soft_limit_per_minute: u32,
    /// Per-IP requests per minute
    pub hard_limit_per_minute: u32,
    /// Full buckets untouched for longer than this are pruned
    pub idle_ttl: Duration,
    /// Fraction of checks that also sweep idle buckets (0.0 never, 1.0 always)
    pub prune_sample_rate: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            soft_limit_per_minute: 30,
            hard_limit_per_minute: 100,
            idle_ttl: Duration::from_secs(10 * 60),
            prune_sample_rate: 0.01,
        }
    }
}

impl RateLimitConfig {
    pub fn new(soft_limit_per_minute: u32, hard_limit_per_minute: u32) -> Self {
        Self {
            soft_limit_per_minute,
            hard_limit_per_minute,
            ..Default::default()
        }
    }

    pub fn idle_ttl_ms(&self) -> i64 {
        self.idle_ttl.as_millis() as i64
    }

    fn capacity(&self, tier: LimitTier) -> f64 {
        let per_minute = match tier {
            LimitTier::Soft => self.soft_limit_per_minute,
            LimitTier::Hard => self.hard_limit_per_minute,
        };
        f64::from(per_minute.max(1))
    }
}

/// Which limit rejected a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitTier {
    Soft,
    Hard,
}

impl LimitTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitTier::Soft => "soft",
            LimitTier::Hard => "hard",
        }
    }

    fn key(&self, identity: &str) -> String {
        match self {
            LimitTier::Soft => format!("user:{identity}"),
            LimitTier::Hard => format!("ip:{identity}"),
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Whole tokens left after this request (0 on rejection)
    pub remaining: u32,
    /// Unix ms when the bucket is full again (allowed) or holds one token (rejected)
    pub reset_at_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limited_by: Option<LimitTier>,
}

impl RateLimitResult {
    /// Seconds until `reset_at_ms`, rounded up, at least 1.
    pub fn retry_after_secs(&self, now_ms: i64) -> u64 {
        let wait_ms = (self.reset_at_ms - now_ms).max(0) as u64;
        wait_ms.div_ceil(1000).max(1)
    }

    /// `reset_at_ms` in whole Unix seconds (rounded up).
    pub fn reset_at_secs(&self) -> i64 {
        self.reset_at_ms.div_euclid(1000) + i64::from(self.reset_at_ms.rem_euclid(1000) != 0)
    }
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    tokens: f64,
    last_refill_ms: i64,
}

impl Bucket {
    fn full(capacity: f64, now_ms: i64) -> Self {
        Self {
            tokens: capacity,
            last_refill_ms: now_ms,
        }
    }

    /// Token count at `now_ms` without mutating the bucket.
    fn projected(&self, capacity: f64, now_ms: i64) -> f64 {
        let elapsed_ms = (now_ms - self.last_refill_ms).max(0) as f64;
        (self.tokens + elapsed_ms * capacity / REFILL_WINDOW_MS).min(capacity)
    }

    fn refill(&mut self, capacity: f64, now_ms: i64) {
        self.tokens = self.projected(capacity, now_ms);
        self.last_refill_ms = self.last_refill_ms.max(now_ms);
    }
}

struct Consumed {
    allowed: bool,
    remaining: u32,
    reset_at_ms: i64,
}

/// Whole seconds for `deficit` tokens to drip back in, rounded up.
fn seconds_to_refill(deficit: f64, capacity: f64) -> i64 {
    let per_second = capacity * 1000.0 / REFILL_WINDOW_MS;
    (deficit / per_second).ceil().max(0.0) as i64
}

fn consume(buckets: &mut HashMap<String, Bucket>, key: String, capacity: f64, now_ms: i64) -> Consumed {
    let bucket = buckets
        .entry(key)
        .or_insert_with(|| Bucket::full(capacity, now_ms));
    bucket.refill(capacity, now_ms);

    if bucket.tokens >= 1.0 {
        bucket.tokens -= 1.0;
        Consumed {
            allowed: true,
            remaining: bucket.tokens.floor() as u32,
            reset_at_ms: now_ms + seconds_to_refill(capacity - bucket.tokens, capacity) * 1000,
        }
    } else {
        Consumed {
            allowed: false,
            remaining: 0,
            reset_at_ms: now_ms + seconds_to_refill(1.0 - bucket.tokens, capacity) * 1000,
        }
    }
}

/// In-memory two-tier token bucket limiter
///
/// ```rust
/// use platform::clock::ManualClock;
/// use platform::rate_limit::{LimitTier, RateLimitConfig, RateLimiter};
///
/// let clock = ManualClock::shared(0);
/// let limiter = RateLimiter::new(RateLimitConfig::new(30, 2), clock);
/// assert!(limiter.check("1.2.3.4", None).allowed);
/// assert!(limiter.check("1.2.3.4", None).allowed);
/// assert_eq!(limiter.check("1.2.3.4", None).limited_by, Some(LimitTier::Hard));
/// ```
pub struct RateLimiter {
    config: RateLimitConfig,
    clock: SharedClock,
    soft: Mutex<HashMap<String, Bucket>>,
    hard: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, clock: SharedClock) -> Self {
        Self {
            config,
            clock,
            soft: Mutex::new(HashMap::new()),
            hard: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Check both tiers with this limiter's own configuration.
    pub fn check(&self, ip: &str, user_id: Option<&str>) -> RateLimitResult {
        self.check_with(ip, user_id, &self.config)
    }

    /// Check both tiers with per-route limits.
    ///
    /// The hard bucket is consumed first; on rejection the soft bucket is not
    /// touched. An empty `user_id` counts as absent.
    pub fn check_with(
        &self,
        ip: &str,
        user_id: Option<&str>,
        config: &RateLimitConfig,
    ) -> RateLimitResult {
        let now_ms = self.clock.now_ms();
        let hard_capacity = config.capacity(LimitTier::Hard);
        let soft_capacity = config.capacity(LimitTier::Soft);

        let hard = {
            let mut buckets = self.hard.lock().unwrap_or_else(PoisonError::into_inner);
            consume(&mut buckets, LimitTier::Hard.key(ip), hard_capacity, now_ms)
        };

        if !hard.allowed {
            tracing::debug!(ip = %ip, "Hard rate limit exceeded");
            return RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_at_ms: hard.reset_at_ms,
                limited_by: Some(LimitTier::Hard),
            };
        }

        let result = match user_id.filter(|id| !id.is_empty()) {
            Some(user_id) => {
                let soft = {
                    let mut buckets = self.soft.lock().unwrap_or_else(PoisonError::into_inner);
                    consume(&mut buckets, LimitTier::Soft.key(user_id), soft_capacity, now_ms)
                };
                if !soft.allowed {
                    tracing::debug!(user_id = %user_id, "Soft rate limit exceeded");
                    return RateLimitResult {
                        allowed: false,
                        remaining: 0,
                        reset_at_ms: soft.reset_at_ms,
                        limited_by: Some(LimitTier::Soft),
                    };
                }
                RateLimitResult {
                    allowed: true,
                    remaining: soft.remaining.min(hard.remaining),
                    reset_at_ms: soft.reset_at_ms,
                    limited_by: None,
                }
            }
            None => RateLimitResult {
                allowed: true,
                remaining: hard.remaining,
                reset_at_ms: hard.reset_at_ms,
                limited_by: None,
            },
        };

        if self.config.prune_sample_rate > 0.0 && rand::random::<f64>() < self.config.prune_sample_rate
        {
            self.prune_idle_at(now_ms, config);
        }

        result
    }

    /// Remove idle full buckets. Returns the number removed.
    pub fn prune_idle(&self) -> usize {
        self.prune_idle_at(self.clock.now_ms(), &self.config)
    }

    fn prune_idle_at(&self, now_ms: i64, config: &RateLimitConfig) -> usize {
        let idle_ttl_ms = config.idle_ttl_ms();
        let sweep = |buckets: &Mutex<HashMap<String, Bucket>>, capacity: f64| {
            let mut buckets = buckets.lock().unwrap_or_else(PoisonError::into_inner);
            let before = buckets.len();
            buckets.retain(|_, bucket| {
                let idle = now_ms - bucket.last_refill_ms > idle_ttl_ms;
                !(idle && bucket.projected(capacity, now_ms) >= capacity)
            });
            before - buckets.len()
        };

        let removed = sweep(&self.hard, config.capacity(LimitTier::Hard))
            + sweep(&self.soft, config.capacity(LimitTier::Soft));
        if removed > 0 {
            tracing::debug!(removed, "Pruned idle rate limit buckets");
        }
        removed
    }

    /// Projected token count for an identity, `None` if it has no bucket.
    pub fn tokens(&self, tier: LimitTier, identity: &str) -> Option<f64> {
        let now_ms = self.clock.now_ms();
        let capacity = self.config.capacity(tier);
        let buckets = match tier {
            LimitTier::Soft => &self.soft,
            LimitTier::Hard => &self.hard,
        };
        let buckets = buckets.lock().unwrap_or_else(PoisonError::into_inner);
        buckets
            .get(&tier.key(identity))
            .map(|bucket| bucket.projected(capacity, now_ms))
    }

    /// Live buckets across both tiers.
    pub fn bucket_count(&self) -> usize {
        let hard = self.hard.lock().unwrap_or_else(PoisonError::into_inner).len();
        let soft = self.soft.lock().unwrap_or_else(PoisonError::into_inner).len();
        hard + soft
    }
}
