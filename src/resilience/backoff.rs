//! Delay schedule between resubscribe attempts.

use std::time::Duration;

use rand::Rng;

use crate::config::WatcherConfig;

/// Exponential delay schedule that owns its attempt counter.
///
/// Each call to [`next_delay`](Self::next_delay) doubles the previous
/// step, stays within `max`, and adds up to 10% jitter on top. A
/// successful subscription calls [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct ResubscribeBackoff {
    base: Duration,
    max: Duration,
    attempt: u32,
}

impl ResubscribeBackoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max: max.max(base),
            attempt: 0,
        }
    }

    pub fn from_config(config: &WatcherConfig) -> Self {
        Self::new(
            Duration::from_millis(config.resubscribe_base_delay_ms),
            Duration::from_millis(config.resubscribe_max_delay_ms),
        )
    }

    /// Attempts made since the last reset.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Count one more attempt and return how long to wait before it.
    pub fn next_delay(&mut self) -> Duration {
        let step = self
            .base
            .checked_mul(1u32.checked_shl(self.attempt).unwrap_or(u32::MAX))
            .map_or(self.max, |d| d.min(self.max));
        self.attempt = self.attempt.saturating_add(1);

        let spread = step / 10;
        if spread.is_zero() {
            return step;
        }
        step + rand::thread_rng().gen_range(Duration::ZERO..=spread)
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}
