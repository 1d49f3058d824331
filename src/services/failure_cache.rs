use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailureKind {
    RateLimited,
    Upstream,
}

impl FailureKind {
    fn ttl(&self) -> Duration {
        match self {
            // Back off a full hour when the provider throttles us
            FailureKind::RateLimited => Duration::minutes(60),
            FailureKind::Upstream => Duration::minutes(15),
        }
    }
}

#[derive(Debug, Clone)]
struct FailureInfo {
    failed_at: DateTime<Utc>,
    kind: FailureKind,
}

/// Thread-safe cache of tickers whose price source recently failed.
///
/// A large portfolio resolves prices ticker by ticker; without this, a dead
/// provider would be hit once per holding per run until it recovers.
#[derive(Clone)]
pub struct FailureCache {
    cache: Arc<DashMap<String, FailureInfo>>,
}

impl FailureCache {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Whether the ticker failed recently enough to skip another attempt.
    pub fn is_failed(&self, ticker: &str) -> bool {
        if let Some(entry) = self.cache.get(ticker) {
            let expiry = entry.failed_at + entry.kind.ttl();
            if Utc::now() < expiry {
                return true;
            }
            drop(entry);
            self.cache.remove(ticker);
        }
        false
    }

    pub fn record_failure(&self, ticker: &str, kind: FailureKind) {
        self.cache.insert(
            ticker.to_string(),
            FailureInfo {
                failed_at: Utc::now(),
                kind,
            },
        );
    }

    pub fn clear(&self, ticker: &str) {
        self.cache.remove(ticker);
    }
}

impl Default for FailureCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_failure_is_reported() {
        let cache = FailureCache::new();
        cache.record_failure("AAPL", FailureKind::Upstream);
        assert!(cache.is_failed("AAPL"));
        assert!(!cache.is_failed("MSFT"));
    }

    #[test]
    fn clear_removes_entry() {
        let cache = FailureCache::new();
        cache.record_failure("AAPL", FailureKind::RateLimited);
        cache.clear("AAPL");
        assert!(!cache.is_failed("AAPL"));
    }
}
