use std::time::Duration;

use rand::Rng;

/// Exponential backoff configuration.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// Base delay for first retry.
    pub base: Duration,

    /// Maximum delay before jitter.
    pub max: Duration,

    /// Jitter factor (0.0 to 1.0).
    pub jitter: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(100),
            max: Duration::from_secs(30),
            jitter: 0.25,
        }
    }
}

impl BackoffPolicy {
    /// Policy without jitter, for deterministic delays.
    pub fn fixed_ratio(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            jitter: 0.0,
        }
    }

    /// Calculate delay for the given attempt number (0-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let exp = 2.0_f64.powi(attempt.min(30) as i32);
        let delay = (self.base.as_millis() as f64 * exp).min(self.max.as_millis() as f64);

        let jitter_range = delay * self.jitter.clamp(0.0, 1.0);
        let jitter = if jitter_range > 0.0 {
            rand::rng().random_range(0.0..=jitter_range)
        } else {
            0.0
        };

        Duration::from_millis((delay + jitter) as u64)
    }
}
