//! Backoff schedule shared by the model adapters.

use std::time::Duration;

/// Most retries a model adapter may be configured with.
pub const MAX_RETRIES: u32 = 10;

/// Pause before retry number `retry` (zero-based): 1s, 2s, 4s …
pub fn retry_backoff(retry: u32) -> Duration {
    Duration::from_secs(1u64.checked_shl(retry).unwrap_or(u64::MAX))
}

/// Worst case for one call: every attempt times out, plus the pauses between them.
pub fn retry_budget(attempt_timeout: Duration, max_retries: u32) -> Duration {
    let attempts = max_retries.saturating_add(1);
    // Past 64 retries every pause is already saturated.
    let pauses = max_retries.min(u64::BITS + 1);
    (0..pauses).fold(attempt_timeout.saturating_mul(attempts), |total, retry| {
        total.saturating_add(retry_backoff(retry))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        assert_eq!(retry_backoff(0), Duration::from_secs(1));
        assert_eq!(retry_backoff(1), Duration::from_secs(2));
        assert_eq!(retry_backoff(3), Duration::from_secs(8));
    }

    #[test]
    fn backoff_saturates_instead_of_overflowing() {
        assert_eq!(retry_backoff(64), Duration::from_secs(u64::MAX));
        assert_eq!(retry_backoff(u32::MAX), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn budget_counts_attempts_and_pauses() {
        assert_eq!(retry_budget(Duration::from_secs(60), 2), Duration::from_secs(183));
        assert_eq!(retry_budget(Duration::from_secs(20), 0), Duration::from_secs(20));
    }

    #[test]
    fn budget_saturates_for_absurd_inputs() {
        assert_eq!(retry_budget(Duration::from_secs(u64::MAX), 3), Duration::MAX);
        assert_eq!(retry_budget(Duration::from_secs(60), u32::MAX), Duration::MAX);
    }
}
