//! Accelerated declared-time clock for simulated journeys.
//!
//! A [`TimeWarp`] maps elapsed tokio time onto a fictional timeline that
//! runs `fast_forward` times faster, starting at a fixed instant. With the
//! defaults (start yesterday at midnight UTC, 3600x) each real second of
//! journey is one declared hour.
//!
//! Elapsed time is read from [`tokio::time::Instant`], so a paused test
//! clock drives declared timestamps deterministically.

use std::time::Duration;

use chrono::{DateTime, Days, NaiveTime, TimeDelta, TimeZone, Utc};
use tokio::time::Instant;

/// Default speed-up of declared time over elapsed time.
pub const DEFAULT_FAST_FORWARD: u32 = 3600;

/// A clock whose declared time runs faster than wall time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWarp {
    start: DateTime<Utc>,
    origin: Instant,
    fast_forward: u32,
}

impl TimeWarp {
    /// A clock reading `start` now and advancing `fast_forward` times faster
    /// than the tokio clock.
    pub fn new(start: DateTime<Utc>, fast_forward: u32) -> Self {
        Self {
            start,
            origin: Instant::now(),
            fast_forward,
        }
    }

    /// A clock starting at midnight UTC `days` days before today.
    pub fn starting_days_ago(days: u32, fast_forward: u32) -> Self {
        let today = Utc::now().date_naive();
        let day = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(today);
        Self::new(Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)), fast_forward)
    }

    /// The declared start instant.
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// The speed-up factor.
    pub const fn fast_forward(&self) -> u32 {
        self.fast_forward
    }

    /// Declared time for the current tokio instant.
    pub fn now(&self) -> DateTime<Utc> {
        self.at(self.origin.elapsed())
    }

    /// Declared time after `elapsed` real time. Saturates at the latest
    /// representable instant.
    pub fn at(&self, elapsed: Duration) -> DateTime<Utc> {
        elapsed
            .checked_mul(self.fast_forward)
            .and_then(|warped| TimeDelta::from_std(warped).ok())
            .and_then(|delta| self.start.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl Default for TimeWarp {
    fn default() -> Self {
        Self::starting_days_ago(1, DEFAULT_FAST_FORWARD)
    }
}
