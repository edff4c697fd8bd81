//! Sliding-window rate limiter (spec section 4.11), keyed by player id.
//! Deliberately simple: a VecDeque of recent event timestamps per key,
//! trimmed to the configured window on every check.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::config::RateLimitConfig;

pub struct RateLimiter {
    windows: RwLock<HashMap<String, VecDeque<Instant>>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Records one event for `key` and reports whether it's still within
    /// the configured rate. Always records the event, even when over limit,
    /// so a client can't reset its own window by bursting past it.
    pub async fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut guard = self.windows.write().await;
        let entry = guard.entry(key.to_string()).or_default();
        entry.push_back(now);
        while let Some(&front) = entry.front() {
            if now.duration_since(front) > self.config.window {
                entry.pop_front();
            } else {
                break;
            }
        }
        entry.len() <= self.config.max_events
    }

    /// Drops keys that haven't recorded an event recently, bounding memory
    /// for a registry that otherwise grows with every distinct player_id
    /// ever seen.
    pub async fn gc(&self) -> usize {
        let now = Instant::now();
        let mut guard = self.windows.write().await;
        let before = guard.len();
        guard.retain(|_, window| {
            window
                .back()
                .map(|&last| now.duration_since(last) < self.config.gc_age)
                .unwrap_or(false)
        });
        before - guard.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn allows_events_under_the_limit() {
        let config = RateLimitConfig {
            max_events: 3,
            window: Duration::from_secs(60),
            gc_age: Duration::from_secs(3600),
        };
        let limiter = RateLimiter::new(config);
        assert!(limiter.check("p").await);
        assert!(limiter.check("p").await);
        assert!(limiter.check("p").await);
    }

    #[tokio::test]
    async fn rejects_once_over_the_limit() {
        let config = RateLimitConfig {
            max_events: 2,
            window: Duration::from_secs(60),
            gc_age: Duration::from_secs(3600),
        };
        let limiter = RateLimiter::new(config);
        assert!(limiter.check("p").await);
        assert!(limiter.check("p").await);
        assert!(!limiter.check("p").await);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let config = RateLimitConfig {
            max_events: 1,
            window: Duration::from_secs(60),
            gc_age: Duration::from_secs(3600),
        };
        let limiter = RateLimiter::new(config);
        assert!(limiter.check("a").await);
        assert!(limiter.check("b").await);
    }
}
