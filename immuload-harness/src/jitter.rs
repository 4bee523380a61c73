//! Jittered pacing between iterations
//!
//! A pause with mean `m` is drawn uniformly from `[m/2, m/2 + m)`, so the
//! average pause is `m` while consecutive pauses, and pauses of different
//! workers, do not line up. A zero mean disables pacing.

use rand::Rng;
use std::time::Duration;

/// Randomized delay source for one pacing level (between batches or between
/// probe iterations)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterTimer {
    mean: Duration,
}

impl JitterTimer {
    pub fn new(mean: Duration) -> Self {
        Self { mean }
    }

    /// Whether this timer ever pauses
    pub fn is_enabled(&self) -> bool {
        !self.mean.is_zero()
    }

    /// Draw the next delay from the thread-local generator
    pub fn next_delay(&self) -> Duration {
        self.next_delay_with(&mut rand::rng())
    }

    /// Draw the next delay from the given generator
    pub fn next_delay_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.mean.is_zero() {
            return Duration::ZERO;
        }

        let span = u64::try_from(self.mean.as_nanos()).unwrap_or(u64::MAX);
        self.mean / 2 + Duration::from_nanos(rng.random_range(0..span))
    }

    /// Suspend the calling task for the next delay; returns immediately when
    /// pacing is disabled
    pub async fn pause(&self) -> Duration {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        delay
    }
}
