//! In-memory sliding-window limiting for sign-in attempts.
use crate::constants::ratelimit::{LOGIN_RATE_LIMIT, LOGIN_RATE_WINDOW_SECS};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Raised when an account exhausts its sign-in attempt budget.
#[derive(Error, Debug)]
#[error("Too many sign-in attempts. Try again shortly.")]
pub struct RateLimitExceeded;

/// Sliding-window limiter for sign-in attempts, keyed by normalized email.
/// Failed and successful attempts count the same.
#[derive(Clone)]
pub struct LoginRateLimiter {
    attempts: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    limit: usize,
    window: Duration,
}

impl LoginRateLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(
            *LOGIN_RATE_LIMIT,
            Duration::from_secs(*LOGIN_RATE_WINDOW_SECS),
        )
    }

    #[must_use]
    pub fn with_config(limit: usize, window: Duration) -> Self {
        Self {
            attempts: Arc::new(Mutex::new(HashMap::new())),
            limit,
            window,
        }
    }

    /// Check the budget for an account and record this attempt against it.
    pub fn check_and_record(&self, account: &str) -> Result<(), RateLimitExceeded> {
        self.check_and_record_at(account, Instant::now())
    }

    /// Internal: check + record with explicit timestamp (for testing).
    fn check_and_record_at(&self, account: &str, now: Instant) -> Result<(), RateLimitExceeded> {
        let mut attempts = self
            .attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let deque = attempts.entry(account.to_owned()).or_default();
        while let Some(&front) = deque.front() {
            if now.duration_since(front) > self.window {
                deque.pop_front();
            } else {
                break;
            }
        }
        if deque.len() >= self.limit {
            return Err(RateLimitExceeded);
        }
        deque.push_back(now);
        Ok(())
    }
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "ratelimit_test.rs"]
mod tests;
