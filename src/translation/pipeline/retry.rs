/*!
 * Retry policy for provider requests.
 *
 * The backoff lookup is a pure function of the retry number so the policy stays
 * independent of how requests are scheduled.
 */

use std::time::Duration;

/// Bounded retry with a fixed backoff schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per batch, including the first; at least 1
    pub max_attempts: u32,

    /// Delay before the 1st, 2nd, ... retry; the last entry repeats
    pub backoff: Vec<Duration>,
}

impl RetryPolicy {
    /// Create a policy; zero attempts is treated as one
    pub fn new(max_attempts: u32, backoff: Vec<Duration>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// A policy that never retries
    pub fn no_retry() -> Self {
        Self::new(1, Vec::new())
    }

    /// Delay to wait before retry number `retry` (1-based)
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        backoff_delay(&self.backoff, retry)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            3,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
            ],
        )
    }
}

/// Look up the delay before retry number `retry` (1-based) in `schedule`
///
/// Retries past the end of the schedule reuse its last value. Retry 0 and an empty
/// schedule both mean no delay.
pub fn backoff_delay(schedule: &[Duration], retry: u32) -> Duration {
    if retry == 0 {
        return Duration::ZERO;
    }

    let idx = (retry as usize - 1).min(schedule.len().saturating_sub(1));
    schedule.get(idx).copied().unwrap_or(Duration::ZERO)
}
