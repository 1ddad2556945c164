use std::time::Duration;

/// Upper bound on configured attempts, so a typo cannot stall a request.
pub const MAX_ATTEMPTS_CAP: u32 = 10;

/// Longest single wait between attempts.
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Bounded retry of transient upstream failures with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; always within `1..=MAX_ATTEMPTS_CAP`.
    max_attempts: u32,
    /// Wait after the first failed attempt; doubled after each further one.
    backoff: Duration,
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub const NONE: Self = Self {
        max_attempts: 1,
        backoff: Duration::ZERO,
    };

    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.clamp(1, MAX_ATTEMPTS_CAP),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the attempt following failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}
