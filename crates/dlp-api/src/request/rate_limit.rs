//! Fixed-window rate limiting keyed by client identity.
//!
//! A record's window starts when it is (re)initialized and is not extended by
//! later requests, so a client can get up to twice the budget across a window
//! boundary.

use crate::config::RateLimitConfig;
use crate::error::ApiError;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RateLimitRecord {
    count: u32,
    reset_at_ms: i64,
}

/// Outcome of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at_ms: i64,
    pub retry_after_ms: u64,
}

impl RateLimitDecision {
    pub fn into_result(self) -> Result<Self, ApiError> {
        if self.allowed {
            Ok(self)
        } else {
            Err(ApiError::RateLimited {
                retry_after_ms: self.retry_after_ms,
            })
        }
    }
}

#[derive(Debug)]
pub struct RateLimiter {
    window_ms: i64,
    max_requests: u32,
    max_tracked_clients: usize,
    records: HashMap<String, RateLimitRecord>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            window_ms: config.window_ms.min(i64::MAX as u64) as i64,
            max_requests: config.max_requests,
            max_tracked_clients: config.max_tracked_clients.max(1),
            records: HashMap::new(),
        }
    }

    /// Check against the wall clock
    pub fn check(&mut self, key: &str) -> RateLimitDecision {
        self.check_at(key, chrono::Utc::now().timestamp_millis())
    }

    /// Count one request from `key` at `now_ms`.
    pub fn check_at(&mut self, key: &str, now_ms: i64) -> RateLimitDecision {
        let window_ms = self.window_ms;
        let max_requests = self.max_requests;

        let live = self
            .records
            .get_mut(key)
            .filter(|record| now_ms < record.reset_at_ms);

        let decision = match live {
            Some(record) if record.count >= max_requests => RateLimitDecision {
                allowed: false,
                limit: max_requests,
                remaining: 0,
                reset_at_ms: record.reset_at_ms,
                retry_after_ms: (record.reset_at_ms - now_ms).max(0) as u64,
            },
            Some(record) => {
                record.count += 1;
                RateLimitDecision {
                    allowed: true,
                    limit: max_requests,
                    remaining: max_requests - record.count,
                    reset_at_ms: record.reset_at_ms,
                    retry_after_ms: 0,
                }
            }
            None => {
                let record = RateLimitRecord {
                    count: 1,
                    reset_at_ms: now_ms.saturating_add(window_ms),
                };
                self.records.insert(key.to_string(), record);
                self.enforce_capacity(key, now_ms);
                RateLimitDecision {
                    allowed: true,
                    limit: max_requests,
                    remaining: max_requests.saturating_sub(1),
                    reset_at_ms: record.reset_at_ms,
                    retry_after_ms: 0,
                }
            }
        };

        if !decision.allowed {
            debug!(client = key, retry_after_ms = decision.retry_after_ms, "Rate limit exceeded");
        }
        decision
    }

    /// Drop records whose window has elapsed; returns how many were removed.
    pub fn sweep_expired(&mut self, now_ms: i64) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| now_ms < record.reset_at_ms);
        before - self.records.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.records.len()
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// Keep the map bounded: sweep expired records first, then evict the
    /// records closest to expiry. `keep` is never evicted.
    fn enforce_capacity(&mut self, keep: &str, now_ms: i64) {
        if self.records.len() <= self.max_tracked_clients {
            return;
        }
        let swept = self.sweep_expired(now_ms);
        if self.records.len() <= self.max_tracked_clients {
            debug!(swept, "Swept expired rate limit records");
            return;
        }

        let mut candidates: Vec<(String, i64)> = self
            .records
            .iter()
            .filter(|(k, _)| k.as_str() != keep)
            .map(|(k, r)| (k.clone(), r.reset_at_ms))
            .collect();
        candidates.sort_by_key(|(_, reset_at)| *reset_at);

        let excess = self.records.len() - self.max_tracked_clients;
        for (key, _) in candidates.into_iter().take(excess) {
            self.records.remove(&key);
        }
        debug!(evicted = excess, "Evicted rate limit records over capacity");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, max_tracked_clients: usize) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            window_ms: 60_000,
            max_requests,
            max_tracked_clients,
            ..Default::default()
        })
    }

    #[test]
    fn test_budget_then_deny() {
        let mut rl = limiter(3, 100);
        for i in 0..3 {
            let d = rl.check_at("1.2.3.4", 1_000 + i);
            assert!(d.allowed);
            assert_eq!(d.remaining, 2 - i as u32);
        }
        let denied = rl.check_at("1.2.3.4", 1_010);
        assert!(!denied.allowed);
        assert_eq!(denied.retry_after_ms, 60_000 - 10);
        assert!(matches!(denied.into_result(), Err(ApiError::RateLimited { .. })));
    }

    #[test]
    fn test_window_elapses_and_resets() {
        let mut rl = limiter(1, 100);
        assert!(rl.check_at("a", 0).allowed);
        assert!(!rl.check_at("a", 59_999).allowed);
        let fresh = rl.check_at("a", 60_000);
        assert!(fresh.allowed);
        assert_eq!(fresh.reset_at_ms, 120_000);
    }

    #[test]
    fn test_increments_do_not_move_window() {
        let mut rl = limiter(5, 100);
        rl.check_at("a", 0);
        let later = rl.check_at("a", 30_000);
        assert_eq!(later.reset_at_ms, 60_000);
    }

    #[test]
    fn test_keys_are_independent() {
        let mut rl = limiter(1, 100);
        assert!(rl.check_at("a", 0).allowed);
        assert!(rl.check_at("b", 0).allowed);
        assert!(!rl.check_at("a", 1).allowed);
    }

    #[test]
    fn test_boundary_burst_admits_twice_budget() {
        let mut rl = limiter(2, 100);
        assert!(rl.check_at("a", 0).allowed);
        assert!(rl.check_at("a", 59_999).allowed);
        assert!(rl.check_at("a", 60_000).allowed);
        assert!(rl.check_at("a", 60_001).allowed);
        assert!(!rl.check_at("a", 60_002).allowed);
    }

    #[test]
    fn test_capacity_sweeps_expired_first() {
        let mut rl = limiter(10, 2);
        rl.check_at("old", 0);
        rl.check_at("recent", 50_000);
        rl.check_at("new", 70_000);
        assert_eq!(rl.tracked_clients(), 2);
        assert!(rl.check_at("recent", 70_001).allowed);
        assert_eq!(rl.check_at("recent", 70_002).remaining, 7);
    }

    #[test]
    fn test_capacity_evicts_oldest_live_record() {
        let mut rl = limiter(10, 2);
        rl.check_at("a", 0);
        rl.check_at("b", 10);
        rl.check_at("c", 20);
        assert_eq!(rl.tracked_clients(), 2);
        // "a" was evicted, so it starts a fresh window
        assert_eq!(rl.check_at("a", 30).reset_at_ms, 60_030);
    }

    #[test]
    fn test_reset_clears_records() {
        let mut rl = limiter(1, 100);
        rl.check_at("a", 0);
        rl.reset();
        assert!(rl.check_at("a", 1).allowed);
    }
}
