//! Exponential reconnection backoff.

use std::time::Duration;

/// Retries allowed after a connection is lost before the channel gives up.
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Delay before the first retry. Doubles on every further retry.
pub const BASE_RECONNECT_DELAY: Duration = Duration::from_millis(1000);

/// Tracks retry attempts and the delay for the next one.
///
/// With the defaults the schedule is 1s, 2s, 4s, 8s, 16s, then exhausted.
/// A successful open must call [`Backoff::reset`] so a later outage starts
/// from the base delay again.
#[derive(Debug, Clone)]
pub struct Backoff {
    max_attempts: u32,
    base_delay: Duration,
    attempt: u32,
    current_delay: Duration,
}

impl Backoff {
    /// Creates a backoff with custom limits.
    pub fn with_limits(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            attempt: 0,
            current_delay: base_delay,
        }
    }

    /// Number of retries scheduled since the last reset.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Delay the next retry would use.
    pub fn current_delay(&self) -> Duration {
        self.current_delay
    }

    /// Returns true when no retry is left.
    pub fn exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }

    /// Back to attempt 0 and the base delay.
    pub fn reset(&mut self) {
        self.attempt = 0;
        self.current_delay = self.base_delay;
    }

    /// Claims the next retry.
    ///
    /// Returns the delay to wait, or `None` once attempts are exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.exhausted() {
            return None;
        }
        self.attempt += 1;
        let delay = self.current_delay;
        self.current_delay = self.current_delay.saturating_mul(2);
        Some(delay)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::with_limits(MAX_RECONNECT_ATTEMPTS, BASE_RECONNECT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_schedule_doubles_from_one_second() {
        let mut backoff = Backoff::default();
        let delays: Vec<u128> = std::iter::from_fn(|| backoff.next_delay())
            .map(|d| d.as_millis())
            .collect();

        assert_eq!(delays, vec![1000, 2000, 4000, 8000, 16000]);
        assert!(backoff.exhausted());
        assert_eq!(backoff.next_delay(), None);
    }

    #[test]
    fn reset_restores_base_delay() {
        let mut backoff = Backoff::default();
        backoff.next_delay();
        backoff.next_delay();
        assert_eq!(backoff.attempt(), 2);
        assert_eq!(backoff.current_delay(), Duration::from_millis(4000));

        backoff.reset();

        assert_eq!(backoff.attempt(), 0);
        assert_eq!(backoff.next_delay(), Some(BASE_RECONNECT_DELAY));
    }

    #[test]
    fn zero_attempts_is_immediately_exhausted() {
        let mut backoff = Backoff::with_limits(0, BASE_RECONNECT_DELAY);
        assert!(backoff.exhausted());
        assert_eq!(backoff.next_delay(), None);
    }

    proptest! {
        #[test]
        fn yields_exactly_max_attempts(max in 0u32..20, base_ms in 1u64..10_000) {
            let mut backoff = Backoff::with_limits(max, Duration::from_millis(base_ms));
            let count = std::iter::from_fn(|| backoff.next_delay()).count();
            prop_assert_eq!(count as u32, max);
        }

        #[test]
        fn each_delay_doubles_the_previous(max in 1u32..20, base_ms in 1u64..10_000) {
            let mut backoff = Backoff::with_limits(max, Duration::from_millis(base_ms));
            let delays: Vec<Duration> = std::iter::from_fn(|| backoff.next_delay()).collect();
            prop_assert_eq!(delays[0], Duration::from_millis(base_ms));
            for pair in delays.windows(2) {
                prop_assert_eq!(pair[1], pair[0].saturating_mul(2));
            }
        }
    }
}
