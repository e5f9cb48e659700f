//! In-memory login throttling per client address.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Sliding-window counter of failed login attempts.
#[derive(Debug)]
pub struct LoginRateLimiter {
    attempts: DashMap<String, Vec<Instant>>,
    max_attempts: usize,
    window: Duration,
}

impl LoginRateLimiter {
    /// Creates a limiter allowing `max_attempts` failures per `window`.
    #[must_use]
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            attempts: DashMap::new(),
            max_attempts,
            window,
        }
    }

    /// Returns true when the client has used up its attempts. Expired
    /// attempts are dropped first, and a client left with none is forgotten.
    pub fn is_limited(&self, client: &str) -> bool {
        self.is_limited_at(client, Instant::now())
    }

    /// Records a failed attempt.
    pub fn record_attempt(&self, client: &str) {
        self.attempts
            .entry(client.to_string())
            .or_default()
            .push(Instant::now());
    }

    fn is_limited_at(&self, client: &str, now: Instant) -> bool {
        let limited = {
            let Some(mut entry) = self.attempts.get_mut(client) else {
                return false;
            };
            entry.retain(|t| now.duration_since(*t) < self.window);
            entry.len() >= self.max_attempts
        };
        // The shard guard must be released before removing.
        self.attempts
            .remove_if(client, |_, attempts| attempts.is_empty());
        limited
    }
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(60))
    }
}
