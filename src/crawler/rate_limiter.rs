//! Process-wide request pacing
//!
//! One shared clock for every host: a turn is granted only once the
//! configured interval has elapsed since the previous turn.

use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant};

/// Minimum-interval limiter for outbound requests
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_turn: Option<Instant>,
}

impl RateLimiter {
    /// Creates a limiter from an interval in seconds
    ///
    /// Negative or NaN values are treated as zero; values too large for a
    /// `Duration` saturate.
    pub fn from_secs_f64(seconds: f64) -> Self {
        let interval = if seconds > 0.0 {
            Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
        Self::new(interval)
    }

    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_turn: None,
        }
    }

    /// Waits until the configured interval has passed since the last turn
    ///
    /// The very first call never waits.
    pub async fn wait_turn(&mut self) {
        self.wait_turn_at_least(None).await;
    }

    /// Like [`wait_turn`](Self::wait_turn), but with a per-call floor
    ///
    /// Used to honor a robots.txt `Crawl-delay` larger than the configured
    /// interval. The effective interval is the larger of the two.
    pub async fn wait_turn_at_least(&mut self, floor: Option<Duration>) {
        let interval = floor.map_or(self.interval, |f| f.max(self.interval));

        if let Some(last) = self.last_turn {
            match last.checked_add(interval) {
                Some(ready_at) if ready_at > Instant::now() => {
                    tracing::trace!("Rate limiter sleeping {:?}", ready_at - Instant::now());
                    sleep_until(ready_at).await;
                }
                Some(_) => {}
                None => sleep(interval).await,
            }
        }

        self.last_turn = Some(Instant::now());
    }

    /// Returns the configured interval
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
