//! Retry policy for transient failures.
//!
//! Transport failures and a fixed set of transient HTTP statuses are retried
//! with exponential backoff: the delay before retry `n` (0-indexed) is
//! `base_delay * 2^n`, with no jitter and no cap, so a policy with a 1s base
//! waits 1s, 2s, 4s, 8s between attempts.

use http::StatusCode;
use std::time::Duration;

/// Statuses the server may recover from on its own: rate limiting and the
/// momentary 5xx family. Other statuses, 501 included, are terminal.
pub(crate) fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Backoff schedule for a call: how many retries are allowed and how long to
/// wait before each one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    max_retries: usize,
    base_delay: Duration,
}

impl RetryPolicy {
    pub(crate) fn new(max_retries: usize, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before the given retry attempt (0-indexed): `base * 2^attempt`.
    pub(crate) fn delay_for(&self, attempt: usize) -> Duration {
        let multiplier = 2u64.saturating_pow(attempt as u32);
        self.base_delay
            .saturating_mul(multiplier.try_into().unwrap_or(u32::MAX))
    }

    pub(crate) fn max_retries(&self) -> usize {
        self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Attempt bookkeeping for one logical call. Created fresh per call.
#[derive(Debug)]
pub(crate) struct RetryState {
    policy: RetryPolicy,
    retries_granted: usize,
}

impl RetryState {
    pub(crate) fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            retries_granted: 0,
        }
    }

    /// Grants one more retry if the budget allows, returning the delay to
    /// wait first. `None` means the retry budget is spent.
    pub(crate) fn next_delay(&mut self) -> Option<Duration> {
        if self.retries_granted >= self.policy.max_retries() {
            return None;
        }
        let delay = self.policy.delay_for(self.retries_granted);
        self.retries_granted += 1;
        Some(delay)
    }

    /// Transport attempts made so far, counting the initial one.
    pub(crate) fn attempts_made(&self) -> usize {
        self.retries_granted + 1
    }
}
