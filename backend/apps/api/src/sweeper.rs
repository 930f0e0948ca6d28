//! Background Sweeper
//!
//! Periodically drops expired cache entries, expired deny-list entries and
//! idle full rate-limit buckets. Runs alongside the sampled pruning the
//! primitives do on their own hot paths.

use std::sync::Arc;
use std::time::Duration;

use access::domain::RevocationStore;
use access::infra::InMemoryRevocationStore;
use platform::cache::ResponseCache;
use platform::rate_limit::RateLimiter;
use tokio::task::JoinHandle;

/// Entries removed by one sweep
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub cache_entries: usize,
    pub denied_tokens: usize,
    pub rate_limit_buckets: usize,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.cache_entries + self.denied_tokens + self.rate_limit_buckets
    }
}

#[derive(Clone)]
pub struct Sweeper {
    pub cache: Arc<ResponseCache>,
    pub revocations: Arc<InMemoryRevocationStore>,
    pub limiter: Arc<RateLimiter>,
}

impl Sweeper {
    /// Run one sweep now.
    pub async fn sweep(&self) -> SweepReport {
        let denied_tokens = self.revocations.prune_expired().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Deny-list prune failed");
            0
        });

        SweepReport {
            cache_entries: self.cache.prune(),
            denied_tokens,
            rate_limit_buckets: self.limiter.prune_idle(),
        }
    }

    /// Sweep every `every` until the runtime shuts down.
    pub fn spawn(self, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let report = self.sweep().await;
                if report.total() > 0 {
                    tracing::debug!(
                        cache_entries = report.cache_entries,
                        denied_tokens = report.denied_tokens,
                        rate_limit_buckets = report.rate_limit_buckets,
                        "Sweep removed expired state"
                    );
                }
            }
        })
    }
}
