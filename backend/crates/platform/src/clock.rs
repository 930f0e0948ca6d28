//! Wall clock abstraction
//!
//! Every time-dependent primitive (bucket refill, breaker recovery, cache and
//! token expiry) reads time through [`Clock`] so tests can drive it manually.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Source of Unix wall-clock time.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    /// Whole seconds since the Unix epoch (floored).
    fn now_secs(&self) -> i64 {
        self.now_ms().div_euclid(1000)
    }

    /// Current time as an RFC 3339 UTC string with milliseconds.
    fn now_iso(&self) -> String {
        to_iso8601(self.now_ms())
    }
}

/// `2026-02-25T10:00:00.000Z` for a Unix millisecond timestamp.
///
/// Out-of-range timestamps render as the epoch.
pub fn to_iso8601(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .unwrap_or_default()
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Clock shared between primitives.
pub type SharedClock = Arc<dyn Clock>;

/// Real time via `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Convenience constructor returning a [`SharedClock`].
    pub fn shared() -> SharedClock {
        Arc::new(SystemClock)
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for tests and simulations.
///
/// ```rust
/// use platform::clock::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new(1_000);
/// clock.advance(Duration::from_secs(2));
/// assert_eq!(clock.now_ms(), 3_000);
/// assert_eq!(clock.now_secs(), 3);
/// ```
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
        }
    }

    /// Shared handle, usable both as `Arc<ManualClock>` and as a [`SharedClock`].
    pub fn shared(start_ms: i64) -> Arc<Self> {
        Arc::new(Self::new(start_ms))
    }

    pub fn advance(&self, by: Duration) {
        self.advance_ms(by.as_millis() as i64);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set_ms(&self, ms: i64) {
        self.now_ms.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualClock")
            .field("now_ms", &self.now_ms())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }

    #[test]
    fn test_iso_format() {
        let clock = ManualClock::new(1_772_013_600_123);
        assert_eq!(clock.now_iso(), "2026-02-25T10:00:00.123Z");
        assert_eq!(to_iso8601(0), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_now_secs_floors_negative() {
        let clock = ManualClock::new(-1);
        assert_eq!(clock.now_secs(), -1);
    }

    #[test]
    fn test_manual_clock_can_go_backwards() {
        let clock = ManualClock::new(10_000);
        clock.set_ms(5_000);
        assert_eq!(clock.now_ms(), 5_000);
        clock.advance_ms(-1_000);
        assert_eq!(clock.now_ms(), 4_000);
    }
}
